//! JWT token manager
//!
//! Shared bearer-token machinery for the auth and notes services:
//! - HS256 access/refresh token pairs with per-type lifetimes
//! - Typed validation with distinct internal error kinds
//! - axum middleware that authenticates requests and exposes the caller's identity

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;
pub use domain::{AuthenticatedIdentity, SubjectId, TokenError, TokenPair, TokenType};
pub use infrastructure::auth::{JwtConfig, JwtManager};

use api::state::AppState;

/// Build the application state from loaded configuration
pub fn create_app_state(config: &AppConfig) -> Result<AppState, ::config::ConfigError> {
    let jwt_config = config.jwt.to_jwt_config()?;
    Ok(AppState::new(JwtManager::new(jwt_config)))
}
