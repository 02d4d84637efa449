//! Type definitions for admin_panel
//!
//! Shared startup error type and the configuration models used throughout the app.

use serde::Deserialize;
use thiserror::Error;

/// Application startup errors
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database connection error: {0}")]
    Database(String),
    #[error("Template error: {0}")]
    Template(String),
    #[error("Password hasher error: {0}")]
    Password(String),
    #[error("Server binding error: {0}")]
    ServerBind(String),
}

impl From<config::ConfigError> for StartupError {
    fn from(error: config::ConfigError) -> Self {
        StartupError::Config(error.to_string())
    }
}

/// Complete app configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub password: PasswordConfig,
    /// Comma separated list of allowed origins, `*` for any
    pub cors_origins: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 0 lets actix pick one worker per core
    pub workers: usize,
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub max_connections: usize,
    pub connect_timeout_secs: u64,
    pub ssl: bool,
    pub auto_migrate: bool,
}

impl DatabaseConfig {
    /// Connection URL with the password masked, for logs
    pub fn masked_url(&self) -> String {
        format!("postgresql://{}:***@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

/// Session lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}
