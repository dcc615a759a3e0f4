//! Request and response types shared by the HTTP endpoints

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, TOKEN_REJECTED_MESSAGE};
pub use json::Json;
