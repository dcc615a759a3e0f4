//! CLI module
//!
//! Provides subcommands for running the token service and for operating on tokens:
//! - `serve`: HTTP API (health, token refresh, current identity)
//! - `issue`: mint a token pair for a subject
//! - `verify`: check a token and print its subject

pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::auth::JwtManager;

/// JWT token manager for the auth and notes services
#[derive(Parser)]
#[command(name = "jwt-manager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Issue an access/refresh token pair
    Issue(token::IssueArgs),

    /// Validate a token
    Verify(token::VerifyArgs),
}

/// Read `.env`, load configuration and build the token manager
fn load_manager() -> anyhow::Result<(AppConfig, JwtManager)> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let manager = JwtManager::new(config.jwt.to_jwt_config()?);

    Ok((config, manager))
}
