//! PostgreSQL connection pool configuration and setup
//!
//! This module handles the creation and configuration of a connection pool
//! for PostgreSQL database access.

use crate::types::{DatabaseConfig, StartupError};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::time::Duration;
use tokio_postgres::{tls::MakeTlsConnect, NoTls, Socket};

/// Creates a PostgreSQL connection pool from the database section of the configuration
///
/// TLS is negotiated through `native-tls` when `database.ssl` is set.
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, StartupError> {
    if config.ssl {
        let connector = TlsConnector::builder()
            .build()
            .map_err(|e| StartupError::Database(format!("TLS setup failed: {e}")))?;
        create_pool_with_tls(config, MakeTlsConnector::new(connector))
    } else {
        create_pool_with_tls(config, NoTls)
    }
}

/// Creates a PostgreSQL connection pool with the given TLS connector
pub fn create_pool_with_tls<T>(config: &DatabaseConfig, tls: T) -> Result<Pool, StartupError>
where
    T: MakeTlsConnect<Socket> + Clone + Send + Sync + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as tokio_postgres::tls::TlsConnect<Socket>>::Future: Send,
{
    let mut cfg = Config::new();
    cfg.host = Some(config.host.clone());
    cfg.port = Some(config.port);
    cfg.user = Some(config.user.clone());
    cfg.password = Some(config.password.clone());
    cfg.dbname = Some(config.dbname.clone());
    cfg.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    cfg.pool = Some(PoolConfig::new(config.max_connections));

    cfg.create_pool(Some(Runtime::Tokio1), tls)
        .map_err(|e| StartupError::Database(format!("Failed to create pool: {e}")))
}

/// Checks if the database connection is working
pub async fn health_check(pool: &Pool) -> Result<(), String> {
    let client = pool.get().await.map_err(|e| format!("Failed to get database connection: {e}"))?;

    client
        .query_one("SELECT 1", &[])
        .await
        .map_err(|e| format!("Database health check failed: {e}"))?;

    Ok(())
}
