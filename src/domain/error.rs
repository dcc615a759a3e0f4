use thiserror::Error;

use super::token::TokenType;

/// Token issuance, validation and extraction errors
///
/// Every validation kind is a client-side problem and is never retried.
/// `TokenGeneration` indicates a misconfigured signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("missing Authorization header")]
    MissingAuthHeader,

    #[error("invalid Authorization header format")]
    InvalidAuthFormat,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token type: expected {expected}")]
    InvalidTokenType { expected: TokenType },

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("subject id is missing from the token")]
    MissingSubjectId,

    #[error("invalid token")]
    InvalidToken,

    #[error("token generation failed: {message}")]
    TokenGeneration { message: String },
}

impl TokenError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::TokenGeneration {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used for logs only
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "missing_auth_header",
            Self::InvalidAuthFormat => "invalid_auth_format",
            Self::TokenExpired => "token_expired",
            Self::InvalidTokenType { .. } => "invalid_token_type",
            Self::InvalidSignature => "invalid_signature",
            Self::MissingSubjectId => "missing_subject_id",
            Self::InvalidToken => "invalid_token",
            Self::TokenGeneration { .. } => "token_generation_failure",
        }
    }

    /// Static, detail-free description of the error kind
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "Authorization header is missing",
            Self::InvalidAuthFormat => "Authorization header must be 'Bearer <token>'",
            Self::TokenExpired => "Token has expired",
            Self::InvalidTokenType { .. } => "Token type is not accepted here",
            Self::InvalidSignature => "Token signature is invalid",
            Self::MissingSubjectId => "Subject id is missing",
            Self::InvalidToken => "Token is invalid",
            Self::TokenGeneration { .. } => "Failed to generate tokens",
        }
    }

    /// Whether the error was caused by the caller's input rather than the server
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::TokenGeneration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_expected_type() {
        let error = TokenError::InvalidTokenType {
            expected: TokenType::Access,
        };
        assert_eq!(error.to_string(), "invalid token type: expected accessToken");
    }

    #[test]
    fn test_generation_error() {
        let error = TokenError::generation("bad key");
        assert_eq!(error.to_string(), "token generation failed: bad key");
        assert_eq!(error.code(), "token_generation_failure");
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_validation_errors_are_client_errors() {
        let errors = [
            TokenError::MissingAuthHeader,
            TokenError::InvalidAuthFormat,
            TokenError::TokenExpired,
            TokenError::InvalidTokenType {
                expected: TokenType::Refresh,
            },
            TokenError::InvalidSignature,
            TokenError::MissingSubjectId,
            TokenError::InvalidToken,
        ];

        for error in errors {
            assert!(error.is_client_error(), "{} should be a client error", error.code());
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            TokenError::MissingAuthHeader.code(),
            TokenError::InvalidAuthFormat.code(),
            TokenError::TokenExpired.code(),
            TokenError::InvalidTokenType {
                expected: TokenType::Access,
            }
            .code(),
            TokenError::InvalidSignature.code(),
            TokenError::MissingSubjectId.code(),
            TokenError::InvalidToken.code(),
            TokenError::generation("x").code(),
        ];

        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_message_does_not_carry_details() {
        let error = TokenError::generation("secret detail");
        assert!(!error.message().contains("secret detail"));
    }
}
