//! User-related error types

use crate::auth::PasswordError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Message for a missing or empty required parameter
pub const INVALID_PARAMETER: &str = "invalid parameter";

/// User-specific errors. Displayed text is sent to the client verbatim.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    InvalidParameter(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    Validation(String),

    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("database connection error: {0}")]
    Pool(String),

    #[error("{0}")]
    Password(#[from] PasswordError),

    #[error("render error: {0}")]
    Render(String),
}

impl UserError {
    pub fn invalid_parameter() -> Self {
        UserError::InvalidParameter(INVALID_PARAMETER.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            UserError::PasswordMismatch => StatusCode::BAD_REQUEST,
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("Rejected request: {self}");
        }
    }
}

impl ResponseError for UserError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<tokio_postgres::Error> for UserError {
    fn from(error: tokio_postgres::Error) -> Self {
        UserError::Database(error.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for UserError {
    fn from(error: deadpool_postgres::PoolError) -> Self {
        UserError::Pool(error.to_string())
    }
}

impl From<minijinja::Error> for UserError {
    fn from(error: minijinja::Error) -> Self {
        UserError::Render(error.to_string())
    }
}

/// Error of the state-changing endpoints, answered as `{"message": ...}`
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ActionError(#[from] pub UserError);

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        self.0.log();
        HttpResponse::build(self.0.status_code()).json(json!({ "message": self.0.to_string() }))
    }
}
