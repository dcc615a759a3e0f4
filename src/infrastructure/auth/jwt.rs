//! HS256 token issuance and validation

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::domain::{Clock, SubjectId, SystemClock, TokenClaims, TokenError, TokenPair, TokenType};

/// The only accepted signing algorithm
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
const SIGNING_ALGORITHM_NAME: &str = "HS256";

const SECONDS_PER_HOUR: u64 = 3600;

/// Signing secret and token lifetimes
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        access_token_lifetime: Duration,
        refresh_token_lifetime: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_lifetime,
            refresh_token_lifetime,
        }
    }

    /// Create configuration with lifetimes given in whole hours
    pub fn from_hours(secret: impl Into<Vec<u8>>, access_hours: u64, refresh_hours: u64) -> Self {
        Self::new(
            secret,
            Duration::from_secs(access_hours.saturating_mul(SECONDS_PER_HOUR)),
            Duration::from_secs(refresh_hours.saturating_mul(SECONDS_PER_HOUR)),
        )
    }

    pub fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_token_lifetime,
            TokenType::Refresh => self.refresh_token_lifetime,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .finish()
    }
}

/// Issues and validates typed access/refresh tokens
///
/// Immutable after construction; clones share the same keys and clock.
#[derive(Clone)]
pub struct JwtManager {
    inner: Arc<JwtManagerInner>,
}

struct JwtManagerInner {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("config", &self.inner.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .field("clock", &self.inner.clock)
            .finish()
    }
}

/// Claims read back from a token before any of them is trusted
#[derive(Debug, Deserialize)]
struct UntrustedClaims {
    id: Option<Value>,
    #[serde(rename = "type")]
    token_type: Option<Value>,
    exp: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UntrustedHeader {
    alg: Option<String>,
}

impl JwtManager {
    /// Create a manager that reads the system clock
    pub fn new(config: JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.secret);
        let decoding_key = DecodingKey::from_secret(&config.secret);

        // Expiry is checked against `clock`, not by the library
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            inner: Arc::new(JwtManagerInner {
                config,
                encoding_key,
                decoding_key,
                validation,
                clock,
            }),
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.inner.config
    }

    /// Mint an access token and a refresh token for `subject_id`
    pub fn issue_token_pair(&self, subject_id: SubjectId) -> Result<TokenPair, TokenError> {
        let issued_at = self.inner.clock.now().trunc_subsecs(0);

        let (access_token, access_token_expires_at) =
            self.sign(subject_id, TokenType::Access, issued_at)?;
        let (refresh_token, refresh_token_expires_at) =
            self.sign(subject_id, TokenType::Refresh, issued_at)?;

        debug!(subject_id = %subject_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_token_expires_at,
            refresh_token_expires_at,
        })
    }

    /// Verify `token` and return its subject if it is an unexpired `expected` token
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<SubjectId, TokenError> {
        let result = self.check_token(token, expected);

        if let Err(e) = &result {
            debug!(reason = e.code(), expected = %expected, "Token rejected");
        }

        result
    }

    pub fn validate_access_token(&self, token: &str) -> Result<SubjectId, TokenError> {
        self.validate_token(token, TokenType::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<SubjectId, TokenError> {
        self.validate_token(token, TokenType::Refresh)
    }

    fn sign(
        &self,
        subject_id: SubjectId,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let lifetime = self.inner.config.lifetime(token_type);
        let expires_at = chrono::Duration::from_std(lifetime)
            .ok()
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                error!(token_type = %token_type, ?lifetime, "Token lifetime is out of range");
                TokenError::generation(format!("{} lifetime is out of range", token_type))
            })?;

        let claims = TokenClaims::new(subject_id, token_type, issued_at, expires_at);

        let token = encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            &self.inner.encoding_key,
        )
        .map_err(|e| {
            error!(token_type = %token_type, error = %e, "Failed to sign token");
            TokenError::generation(e.to_string())
        })?;

        Ok((token, expires_at))
    }

    fn check_token(&self, token: &str, expected: TokenType) -> Result<SubjectId, TokenError> {
        ensure_signing_algorithm(token)?;

        let claims = decode::<UntrustedClaims>(token, &self.inner.decoding_key, &self.inner.validation)
            .map_err(classify_decode_error)?
            .claims;

        let exp = claims
            .exp
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(TokenError::InvalidToken)?;

        if is_expired(exp, self.inner.clock.now()) {
            return Err(TokenError::TokenExpired);
        }

        let token_type = claims
            .token_type
            .as_ref()
            .and_then(Value::as_str)
            .and_then(TokenType::from_claim);

        if token_type != Some(expected) {
            return Err(TokenError::InvalidTokenType { expected });
        }

        claims
            .id
            .as_ref()
            .and_then(Value::as_i64)
            .and_then(SubjectId::new)
            .ok_or(TokenError::MissingSubjectId)
    }
}

/// A token stays valid up to and including its `exp` second
fn is_expired(exp: i64, now: DateTime<Utc>) -> bool {
    now.timestamp() > exp
}

/// Reject anything not signed with HS256 before the secret is ever used
fn ensure_signing_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');

    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::InvalidToken);
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::InvalidToken)?;
    let header: UntrustedHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::InvalidToken)?;

    match header.alg.as_deref() {
        Some(SIGNING_ALGORITHM_NAME) => Ok(()),
        _ => Err(TokenError::InvalidSignature),
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        _ => TokenError::InvalidToken,
    }
}
