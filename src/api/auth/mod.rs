//! Authentication API endpoints
//!
//! Token refresh and current-identity lookup. Login lives with the user store
//! and calls [`JwtManager::issue_token_pair`] directly.

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::{jwt_interceptor, CurrentSubject};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{SubjectId, TokenPair};
use crate::infrastructure::auth::JwtManager;

/// Create the authentication router; `/me` sits behind the access-token interceptor
pub fn create_auth_router(jwt_manager: JwtManager) -> Router<AppState> {
    Router::new()
        .route("/me", get(current_identity))
        .route_layer(middleware::from_fn_with_state(jwt_manager, jwt_interceptor))
        .route("/refresh", post(refresh_tokens))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_token_expires_at: pair.access_token_expires_at,
            refresh_token_expires_at: pair.refresh_token_expires_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: SubjectId,
}

/// Exchange a refresh token for a new token pair
///
/// POST /auth/refresh
pub async fn refresh_tokens(
    State(jwt_manager): State<JwtManager>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let subject_id = jwt_manager.validate_refresh_token(&request.refresh_token)?;
    let pair = jwt_manager.issue_token_pair(subject_id)?;

    info!(subject_id = %subject_id, "Tokens refreshed");

    Ok(Json(pair.into()))
}

/// Identity of the caller
///
/// GET /auth/me
pub async fn current_identity(CurrentSubject(subject_id): CurrentSubject) -> Json<IdentityResponse> {
    Json(IdentityResponse { id: subject_id })
}
