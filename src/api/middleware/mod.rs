//! API middleware components

pub mod jwt_auth;
pub mod logging;

pub use jwt_auth::{current_subject_id, extract_bearer_token, jwt_interceptor, CurrentSubject};
pub use logging::logging_middleware;
