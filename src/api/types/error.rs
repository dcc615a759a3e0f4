//! JSON error envelope returned by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::TokenError;

/// The one message clients see for any rejected credential
pub const TOKEN_REJECTED_MESSAGE: &str = "Token is missing or invalid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    AuthenticationError,
    NotFoundError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::AuthenticationError => write!(f, "authentication_error"),
            Self::NotFoundError => write!(f, "not_found_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorType::AuthenticationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Validation failures collapse into one generic 401; the specific kind stays in the logs
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if err.is_client_error() {
            return Self::unauthorized(TOKEN_REJECTED_MESSAGE);
        }

        error!(code = err.code(), error = %err, "Token generation failed");
        Self::internal(err.message())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenType;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Missing field");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.message, "Missing field");
    }

    #[test]
    fn test_validation_errors_map_to_generic_unauthorized() {
        let errors = [
            TokenError::MissingAuthHeader,
            TokenError::InvalidAuthFormat,
            TokenError::TokenExpired,
            TokenError::InvalidTokenType {
                expected: TokenType::Access,
            },
            TokenError::InvalidSignature,
            TokenError::MissingSubjectId,
            TokenError::InvalidToken,
        ];

        for token_err in errors {
            let api_err: ApiError = token_err.into();
            assert_eq!(api_err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(api_err.response.error.message, TOKEN_REJECTED_MESSAGE);
            assert_eq!(api_err.response.error.code, None);
        }
    }

    #[test]
    fn test_generation_failure_maps_to_internal() {
        let api_err: ApiError = TokenError::generation("key rejected").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.response.error.error_type, ApiErrorType::ServerError);
        assert!(!api_err.response.error.message.contains("key rejected"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized(TOKEN_REJECTED_MESSAGE);
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("authentication_error"));
        assert!(json.contains(TOKEN_REJECTED_MESSAGE));
        assert!(!json.contains("code"));
    }

    #[test]
    fn test_with_code() {
        let err = ApiError::bad_request("Invalid JSON").with_code("json_parse_error");
        assert_eq!(err.response.error.code, Some("json_parse_error".to_string()));
    }
}
