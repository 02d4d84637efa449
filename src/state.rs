use crate::auth::session::SessionStore;
use crate::templates::TemplateEngine;
use crate::user::service::UserService;
use std::sync::Arc;

/// Dependencies shared by every handler, registered once as `web::Data`
pub struct AppState {
    pub users: Arc<UserService>,
    pub sessions: Arc<dyn SessionStore>,
    pub templates: Arc<dyn TemplateEngine>,
    /// Name of the cookie carrying the session token
    pub session_cookie: String,
}

impl AppState {
    pub fn new(
        users: Arc<UserService>,
        sessions: Arc<dyn SessionStore>,
        templates: Arc<dyn TemplateEngine>,
        session_cookie: impl Into<String>,
    ) -> Self {
        Self {
            users,
            sessions,
            templates,
            session_cookie: session_cookie.into(),
        }
    }
}
