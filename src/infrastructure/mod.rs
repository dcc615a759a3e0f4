//! Infrastructure layer - token signing and process-wide logging

pub mod auth;
pub mod logging;

pub use auth::{JwtConfig, JwtManager};
