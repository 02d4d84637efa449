//! Admin Panel Service
//!
//! A server-rendered user administration panel built with Actix-web and `PostgreSQL`.
//! Provides user listing, registration, profile edits, role assignment,
//! freeze/unfreeze and password reset, plus a health endpoint.

pub mod auth;
pub mod config;
pub mod health;
pub mod mocks;
pub mod postgres;
pub mod state;
pub mod templates;
pub mod types;
pub mod user;
pub mod utils;

pub use state::AppState;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "admin-panel";
