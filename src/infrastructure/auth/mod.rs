//! Authentication infrastructure module
//!
//! This module provides JWT token management shared by the auth and notes services.

mod jwt;

pub use jwt::{JwtConfig, JwtManager};
