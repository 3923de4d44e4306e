//! Application configuration loaded from environment variables.
//!
//! Fail-fast: required variables must be present and valid or startup
//! aborts with a clear error.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// The listen address could not be parsed.
    #[error("Invalid LISTEN_ADDR: {0}")]
    InvalidListenAddr(String),
}

/// Runtime configuration for the access API server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,

    /// Socket address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// Roles entitled to reconcile permissions.
    pub reconcile_roles: Vec<String>,

    /// Roles entitled to broad authorization-history access.
    pub history_roles: Vec<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `DATABASE_URL` is required. `LISTEN_ADDR` defaults to
    /// `0.0.0.0:8080`; `RECONCILE_ROLES` and `HISTORY_ROLES` are
    /// comma-separated lists defaulting to `admin`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidListenAddr(format!("{e}")))?;

        let reconcile_roles = parse_roles(env::var("RECONCILE_ROLES").ok());
        let history_roles = parse_roles(env::var("HISTORY_ROLES").ok());

        Ok(Self {
            database_url,
            listen_addr,
            reconcile_roles,
            history_roles,
        })
    }
}

/// Parse a comma-separated role list, defaulting to `admin`.
fn parse_roles(value: Option<String>) -> Vec<String> {
    let roles: Vec<String> = value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect();

    if roles.is_empty() {
        vec!["admin".to_string()]
    } else {
        roles
    }
}
