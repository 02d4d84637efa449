//! Session lookup for the logged-in administrator.
//!
//! Sessions are owned by an external login flow; this module only resolves an
//! opaque session token (read from a cookie) to a user id.

use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use futures_util::future::LocalBoxFuture;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Not logged in")]
    Missing,

    #[error("Session store error: {0}")]
    Store(String),
}

impl ResponseError for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::Missing => StatusCode::UNAUTHORIZED,
            SessionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Resolves session tokens to user ids
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the user bound to `token`, or `None` when unknown or expired
    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError>;
}

/// PostgreSQL backed session store reading the `user_sessions` table
pub struct PgSessionStore {
    pool: Pool,
}

impl PgSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
        }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn user_id(&self, token: &str) -> Result<Option<i64>, SessionError> {
        let client = self.pool.get().await.map_err(|e| SessionError::Store(e.to_string()))?;

        let row = client
            .query_opt(
                "SELECT user_id FROM user_sessions WHERE token = $1 AND expires_at > now()",
                &[&token],
            )
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;

        row.map(|row| row.try_get::<_, i64>("user_id"))
            .transpose()
            .map_err(|e| SessionError::Store(e.to_string()))
    }
}

/// Extractor yielding the id of the user owning the request's session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser(pub i64);

impl FromRequest for SessionUser {
    type Error = SessionError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = state
            .as_ref()
            .and_then(|state| req.cookie(&state.session_cookie))
            .map(|cookie| cookie.value().to_string());

        Box::pin(async move {
            let state =
                state.ok_or_else(|| SessionError::Store("application state missing".to_string()))?;
            let token = match token {
                Some(token) if !token.is_empty() => token,
                _ => return Err(SessionError::Missing),
            };

            match state.sessions.user_id(&token).await? {
                Some(user_id) => Ok(SessionUser(user_id)),
                None => Err(SessionError::Missing),
            }
        })
    }
}
