//! PostgreSQL pool and schema

pub mod config;
pub mod database;

pub use config::{create_pool, health_check};
pub use database::ensure_schema;
