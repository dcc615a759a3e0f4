//! Bearer access-token interception and identity extraction
//!
//! Any service can protect a router with:
//!
//! ```ignore
//! router.route_layer(axum::middleware::from_fn_with_state(manager, jwt_interceptor))
//! ```
//!
//! Handlers behind the layer read the caller with the [`CurrentSubject`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, Extensions, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::types::ApiError;
use crate::domain::{AuthenticatedIdentity, SubjectId, TokenError};
use crate::infrastructure::auth::JwtManager;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticate the request with its access token, or answer 401 and stop
pub async fn jwt_interceptor(
    State(manager): State<JwtManager>,
    mut request: Request,
    next: Next,
) -> Response {
    let subject_id = match authenticate(&manager, request.headers()) {
        Ok(subject_id) => subject_id,
        Err(e) => {
            debug!(
                reason = e.code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            return ApiError::from(e).into_response();
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedIdentity::new(subject_id));

    next.run(request).await
}

fn authenticate(manager: &JwtManager, headers: &HeaderMap) -> Result<SubjectId, TokenError> {
    let token = extract_bearer_token(headers)?;
    manager.validate_access_token(token)
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is case-sensitive, separated by exactly one space, and the
/// remainder must be non-empty.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(TokenError::MissingAuthHeader)?;

    let value = value.to_str().map_err(|_| TokenError::InvalidAuthFormat)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(TokenError::InvalidAuthFormat)?;

    if token.is_empty() || token.starts_with(char::is_whitespace) {
        return Err(TokenError::InvalidAuthFormat);
    }

    Ok(token)
}

/// Read the identity attached by [`jwt_interceptor`]
pub fn current_subject_id(extensions: &Extensions) -> Result<SubjectId, TokenError> {
    extensions
        .get::<AuthenticatedIdentity>()
        .map(AuthenticatedIdentity::subject_id)
        .ok_or(TokenError::MissingSubjectId)
}

/// Extractor for the authenticated subject of the current request
///
/// Rejects with the generic 401 when the handler is not behind [`jwt_interceptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSubject(pub SubjectId);

impl<S> FromRequestParts<S> for CurrentSubject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_subject_id(&parts.extensions)
            .map(CurrentSubject)
            .map_err(|e| {
                debug!(reason = e.code(), "No authenticated identity on request");
                ApiError::from(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::api::types::{ApiErrorResponse, TOKEN_REJECTED_MESSAGE};
    use crate::infrastructure::auth::JwtConfig;

    fn create_manager() -> JwtManager {
        JwtManager::new(JwtConfig::from_hours("interceptor-secret", 1, 24))
    }

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    async fn whoami(CurrentSubject(subject_id): CurrentSubject) -> String {
        subject_id.to_string()
    }

    fn protected_app(manager: JwtManager) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(manager, jwt_interceptor))
    }

    async fn call(app: Router, authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn assert_generic_rejection(body: &str) {
        let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, TOKEN_REJECTED_MESSAGE);
        assert_eq!(parsed.error.code, None);
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.e30.sig");
        assert_eq!(extract_bearer_token(&headers), Ok("eyJhbGciOiJIUzI1NiJ9.e30.sig"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(TokenError::MissingAuthHeader)
        );
    }

    #[test]
    fn test_invalid_formats() {
        for value in [
            "Basic dXNlcjpwYXNz",
            "Bearer",
            "Bearer ",
            "bearer token",
            "BEARER token",
            "Bearer  token",
            "Bearertoken",
            "Token abc",
        ] {
            assert_eq!(
                extract_bearer_token(&headers_with(value)),
                Err(TokenError::InvalidAuthFormat),
                "header {:?}",
                value
            );
        }
    }

    #[test]
    fn test_non_ascii_header_is_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            axum::http::HeaderValue::from_bytes("Bearer t\u{f6}ken".as_bytes()).unwrap(),
        );

        assert_eq!(extract_bearer_token(&headers), Err(TokenError::InvalidAuthFormat));
    }

    #[test]
    fn test_current_subject_id_requires_identity() {
        let mut extensions = Extensions::new();
        assert_eq!(
            current_subject_id(&extensions),
            Err(TokenError::MissingSubjectId)
        );

        let subject_id = SubjectId::new(12).unwrap();
        extensions.insert(AuthenticatedIdentity::new(subject_id));
        assert_eq!(current_subject_id(&extensions), Ok(subject_id));
    }

    #[tokio::test]
    async fn test_interceptor_rejects_missing_and_malformed_headers() {
        let manager = create_manager();

        for authorization in [
            None,
            Some("Basic xyz".to_string()),
            Some("Bearer ".to_string()),
            Some("Bearer".to_string()),
            Some("Bearer not-a-jwt".to_string()),
        ] {
            let (status, body) = call(protected_app(manager.clone()), authorization.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", authorization);
            assert_generic_rejection(&body);
        }
    }

    #[tokio::test]
    async fn test_interceptor_attaches_identity() {
        let manager = create_manager();
        let subject_id = SubjectId::new(4242).unwrap();
        let pair = manager.issue_token_pair(subject_id).unwrap();

        let (status, body) = call(
            protected_app(manager),
            Some(format!("Bearer {}", pair.access_token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "4242");
    }

    #[tokio::test]
    async fn test_interceptor_rejects_refresh_token() {
        let manager = create_manager();
        let pair = manager.issue_token_pair(SubjectId::new(1).unwrap()).unwrap();

        let (status, body) = call(
            protected_app(manager),
            Some(format!("Bearer {}", pair.refresh_token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_generic_rejection(&body);
    }

    #[tokio::test]
    async fn test_interceptor_rejects_foreign_signature() {
        let other = JwtManager::new(JwtConfig::from_hours("another-secret", 1, 24));
        let pair = other.issue_token_pair(SubjectId::new(1).unwrap()).unwrap();

        let (status, body) = call(
            protected_app(create_manager()),
            Some(format!("Bearer {}", pair.access_token)),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_generic_rejection(&body);
    }

    #[tokio::test]
    async fn test_extractor_without_interceptor_is_unauthorized() {
        let app = Router::new().route("/whoami", get(whoami));
        let (status, body) = call(app, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_generic_rejection(&body);
    }
}
