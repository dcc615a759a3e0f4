use std::env;

use serde::Deserialize;

use crate::infrastructure::auth::JwtConfig;

/// Legacy variable names used by existing deployments, honoured as overrides
const LEGACY_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("JWT_SECRET_KEY", "jwt.secret"),
    ("JWT_ACCESS_TOKEN_EXPIRATION", "jwt.access_token_expiration_hours"),
    ("JWT_REFRESH_TOKEN_EXPIRATION", "jwt.refresh_token_expiration_hours"),
    ("HOST", "server.host"),
    ("PORT", "server.port"),
];

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token signing settings as loaded from configuration sources
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiration_hours: u64,
    pub refresh_token_expiration_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_expiration_hours: 24,
            refresh_token_expiration_hours: 168,
        }
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[hidden]")
            .field("access_token_expiration_hours", &self.access_token_expiration_hours)
            .field("refresh_token_expiration_hours", &self.refresh_token_expiration_hours)
            .finish()
    }
}

impl JwtSettings {
    /// Reject settings that would produce unusable tokens
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.secret.is_empty() {
            return Err(config::ConfigError::Message(
                "jwt.secret must be set (APP__JWT__SECRET or JWT_SECRET_KEY)".to_string(),
            ));
        }

        if self.access_token_expiration_hours == 0 {
            return Err(config::ConfigError::Message(
                "jwt.access_token_expiration_hours must be greater than zero".to_string(),
            ));
        }

        if self.refresh_token_expiration_hours == 0 {
            return Err(config::ConfigError::Message(
                "jwt.refresh_token_expiration_hours must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn to_jwt_config(&self) -> Result<JwtConfig, config::ConfigError> {
        self.validate()?;

        Ok(JwtConfig::from_hours(
            self.secret.as_bytes(),
            self.access_token_expiration_hours,
            self.refresh_token_expiration_hours,
        ))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load configuration, reading legacy variables through `lookup`
    pub fn load_with<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (variable, key) in LEGACY_ENV_OVERRIDES {
            let value = lookup(variable).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}
