//! Domain layer - token model and errors, free of HTTP concerns

pub mod error;
pub mod token;

pub use error::TokenError;
pub use token::{
    AuthenticatedIdentity, Clock, ManualClock, SubjectId, SystemClock, TokenClaims, TokenPair,
    TokenType,
};
