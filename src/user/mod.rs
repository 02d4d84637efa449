//! User module
//!
//! This module handles user administration: forms, persistence, the lifecycle
//! service and the `/user` HTTP scope.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

pub use error::{ActionError, UserError};
pub use repository::{PgUserRepository, UserRepository};
pub use routes::configure_user_routes;
pub use service::UserService;
