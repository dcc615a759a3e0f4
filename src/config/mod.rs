//! Configuration loading from files, `APP__*` variables and legacy service variables

mod app_config;

pub use app_config::{AppConfig, JwtSettings, LogFormat, LoggingConfig, ServerConfig};
