//! Schema bootstrap
//!
//! Creates the tables used by the admin panel when they do not exist yet.

use crate::types::StartupError;
use deadpool_postgres::Pool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sys_role (
    id          BIGSERIAL PRIMARY KEY,
    name        VARCHAR(64) NOT NULL UNIQUE,
    create_time TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS sys_user (
    id          BIGSERIAL PRIMARY KEY,
    account     VARCHAR(64)  NOT NULL,
    name        VARCHAR(64)  NOT NULL,
    email       VARCHAR(128) NOT NULL DEFAULT '',
    sex         SMALLINT     NOT NULL DEFAULT 0,
    password    VARCHAR(255) NOT NULL,
    salt        VARCHAR(32)  NOT NULL,
    status      SMALLINT     NOT NULL DEFAULT 1,
    role_id     VARCHAR(255) NOT NULL DEFAULT '',
    create_time TIMESTAMPTZ  NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_sys_user_create_time ON sys_user (create_time);

CREATE TABLE IF NOT EXISTS user_sessions (
    token      VARCHAR(128) PRIMARY KEY,
    user_id    BIGINT       NOT NULL REFERENCES sys_user (id),
    expires_at TIMESTAMPTZ  NOT NULL
);
"#;

/// Applies the schema; every statement is idempotent
pub async fn ensure_schema(pool: &Pool) -> Result<(), StartupError> {
    let client = pool
        .get()
        .await
        .map_err(|e| StartupError::Database(format!("Failed to get database connection: {e}")))?;

    client
        .batch_execute(SCHEMA)
        .await
        .map_err(|e| StartupError::Database(format!("Schema migration failed: {e}")))?;

    log::info!("Database schema is up to date");
    Ok(())
}
