//! Configuration management for admin_panel
//!
//! Layers, lowest priority first: built-in defaults, an optional `admin.toml`
//! next to the binary, then `ADMIN__*` environment variables
//! (e.g. `ADMIN__DATABASE__HOST`). `.env` is loaded by `main` beforehand.

use crate::types::{AppConfig, StartupError};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};

const CONFIG_FILE: &str = "admin";
const ENV_PREFIX: &str = "ADMIN";

/// Load complete app configuration
pub fn load_config() -> Result<AppConfig, StartupError> {
    let settings = with_defaults(Config::builder())?
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    validate_config(&config)?;
    Ok(config)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.workers", 0)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.dbname", "admin_panel")?
        .set_default("database.max_connections", 16)?
        .set_default("database.connect_timeout_secs", 5)?
        .set_default("database.ssl", false)?
        .set_default("database.auto_migrate", true)?
        .set_default("session.cookie_name", "admin_session")?
        .set_default("password.memory_kib", i64::from(argon2::Params::DEFAULT_M_COST))?
        .set_default("password.iterations", i64::from(argon2::Params::DEFAULT_T_COST))?
        .set_default("password.parallelism", i64::from(argon2::Params::DEFAULT_P_COST))?
        .set_default("cors_origins", "*")?
        .set_default("log_level", "info")
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), StartupError> {
    if config.database.host.trim().is_empty() {
        return Err(StartupError::Config("Database host can't be empty".to_string()));
    }

    if config.database.dbname.trim().is_empty() {
        return Err(StartupError::Config("Database name can't be empty".to_string()));
    }

    if config.database.port == 0 {
        return Err(StartupError::Config("Database port must be between 1 and 65,535".to_string()));
    }

    if config.database.max_connections == 0 {
        return Err(StartupError::Config("Database pool needs at least one connection".to_string()));
    }

    if config.server.port == 0 {
        return Err(StartupError::Config("Server port must be between 1 and 65,535".to_string()));
    }

    if config.session.cookie_name.trim().is_empty() {
        return Err(StartupError::Config("Session cookie name can't be empty".to_string()));
    }

    argon2::Params::new(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
        None,
    )
    .map_err(|e| StartupError::Config(format!("Invalid password hashing parameters: {e}")))?;

    Ok(())
}
