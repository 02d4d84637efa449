//! HTTP Response Handler
//!
//! Builds the three response shapes of the admin panel:
//! - `{"data": ...}` for reads answered as JSON
//! - `{"message": ...}` for state-changing operations
//! - rendered HTML pages through the injected [`TemplateEngine`]

use crate::templates::TemplateEngine;
use crate::user::error::UserError;
use actix_web::http::header::ContentType;
use actix_web::{http::StatusCode, HttpResponse};
use minijinja::Value;
use serde::Serialize;
use serde_json::json;

/// Message returned by every successful write
pub const SUCCESS_MESSAGE: &str = "success";

pub struct ResponseHandler;

impl ResponseHandler {
    /// 200 with `{"data": payload}`
    pub fn data<T: Serialize>(payload: T) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "data": payload }))
    }

    /// 200 with `{"message": message}`
    pub fn message(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "message": message }))
    }

    /// 200 with `{"message": "success"}`
    pub fn success() -> HttpResponse {
        Self::message(SUCCESS_MESSAGE)
    }

    /// Render `view` with `context` and answer with 200
    pub fn page(templates: &dyn TemplateEngine, view: &str, context: Value) -> Result<HttpResponse, UserError> {
        Self::page_with_status(templates, view, context, StatusCode::OK)
    }

    /// Render `view` with `context` and answer with `status`
    ///
    /// # Errors
    /// Returns [`UserError::Render`] when the view is unknown or fails to render.
    pub fn page_with_status(
        templates: &dyn TemplateEngine,
        view: &str,
        context: Value,
        status: StatusCode,
    ) -> Result<HttpResponse, UserError> {
        let html = templates.render(view, context)?;

        Ok(HttpResponse::build(status).content_type(ContentType::html()).body(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{MiniJinjaEngine, CONTAINER_VIEW};
    use actix_web::body::to_bytes;
    use minijinja::context;

    async fn body_text(response: HttpResponse) -> String {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn test_data_envelope() {
        let response = ResponseHandler::data(vec![1, 2, 3]);
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json, json!({ "data": [1, 2, 3] }));
    }

    #[actix_web::test]
    async fn test_success_message() {
        let response = ResponseHandler::success();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"message":"success"}"#);
    }

    #[actix_web::test]
    async fn test_page_is_html() {
        let engine = MiniJinjaEngine::new().unwrap();
        let response = ResponseHandler::page_with_status(
            &engine,
            CONTAINER_VIEW,
            context! { error => "Not logged in" },
            StatusCode::UNAUTHORIZED,
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("content-type").unwrap(), "text/html; charset=utf-8");
        assert!(body_text(response).await.contains("Not logged in"));
    }

    #[test]
    fn test_unknown_view_is_render_error() {
        let engine = MiniJinjaEngine::new().unwrap();
        let result = ResponseHandler::page(&engine, "missing.html", context! {});

        assert!(matches!(result, Err(UserError::Render(_))));
    }
}
