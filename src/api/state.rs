//! Application state for shared services

use axum::extract::FromRef;

use crate::infrastructure::auth::JwtManager;

/// Application state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub jwt_manager: JwtManager,
}

impl AppState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

impl FromRef<AppState> for JwtManager {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_manager.clone()
    }
}
