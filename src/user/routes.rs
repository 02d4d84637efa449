//! User management routes
//!
//! Configuration of all user-related HTTP endpoints.

use crate::user::error::UserError;
use crate::user::handlers;
use actix_web::{web, Scope};

/// Configure user management routes
pub fn configure_user_routes() -> Scope {
    web::scope("/user")
        // Extraction failures are reported as bad parameters
        .app_data(
            web::FormConfig::default()
                .error_handler(|err, _req| UserError::InvalidParameter(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| UserError::InvalidParameter(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| UserError::InvalidParameter(err.to_string()).into()),
        )
        // Pages
        .route("", web::get().to(handlers::home))
        .route("/", web::get().to(handlers::home))
        .route("/info", web::get().to(handlers::info))
        .route("/user_add", web::get().to(handlers::to_add))
        .route("/user_edit/{id}", web::get().to(handlers::to_edit))
        .route("/role_assign/{id}", web::get().to(handlers::to_role_assign))
        // Reads
        .route("/list", web::post().to(handlers::list))
        .route("/list", web::get().to(handlers::list_query))
        // Writes
        .route("/add", web::post().to(handlers::add))
        .route("/edit", web::post().to(handlers::edit))
        .route("/delete", web::post().to(handlers::delete))
        .route("/reset", web::post().to(handlers::reset))
        .route("/setRole", web::post().to(handlers::set_role))
        .route("/freeze", web::post().to(handlers::freeze))
        .route("/unfreeze", web::post().to(handlers::unfreeze))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{test_state, InMemoryUserRepository, MemorySessionStore};
    use crate::state::AppState;
    use crate::user::models::{NewUser, Sex, UserStatus};
    use crate::user::repository::UserRepository;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;
    use std::sync::Arc;

    async fn seed_user(repo: &InMemoryUserRepository, account: &str) -> i64 {
        repo.save(&NewUser {
            account: account.to_string(),
            name: format!("{account} name"),
            email: format!("{account}@example.com"),
            sex: Sex::Male,
            password: "digest".to_string(),
            salt: "abcdefgh12345678".to_string(),
        })
        .await
        .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(body.to_string())
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data(web::Data::new($state)).service(configure_user_routes()))
                .await
        };
    }

    fn state(repo: &Arc<InMemoryUserRepository>) -> AppState {
        test_state(repo.clone())
    }

    #[actix_web::test]
    async fn test_home_renders() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/user/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("/user/list"));
    }

    #[actix_web::test]
    async fn test_list_returns_data() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed_user(&repo, "alice").await;
        seed_user(&repo, "bob").await;
        let app = app!(state(&repo));

        let resp = test::call_service(&app, form_post("/user/list", "name=ALI").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let json: Value = test::read_body_json(resp).await;
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["account"], "alice");
        assert!(data[0].get("password").is_none());
        assert!(data[0].get("salt").is_none());
    }

    #[actix_web::test]
    async fn test_list_by_query_string() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed_user(&repo, "alice").await;
        let app = app!(state(&repo));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/user/list").to_request()).await;

        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_list_bad_date_is_bad_request() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp =
            test::call_service(&app, form_post("/user/list", "beginTime=yesterday").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(resp).await;
        assert!(json["error"].as_str().unwrap().starts_with("beginTime"));
        assert_eq!(repo.reads(), 0);
    }

    #[actix_web::test]
    async fn test_list_failure_is_internal_error() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.fail_with("db down");
        let app = app!(state(&repo));

        let resp = test::call_service(&app, form_post("/user/list", "").to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "database error: db down");
    }

    #[actix_web::test]
    async fn test_info_without_session() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/user/info").to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("Not logged in"));
        assert_eq!(repo.reads(), 0);
    }

    #[actix_web::test]
    async fn test_info_with_session() {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.insert_role(5, "Auditor");
        let id = seed_user(&repo, "carol").await;
        repo.update(
            id,
            &crate::user::models::UserChanges {
                role_id: Some("5,6".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let sessions = MemorySessionStore::new();
        sessions.insert("tok", id);
        let mut state = state(&repo);
        state.sessions = Arc::new(sessions);
        let cookie_name = state.session_cookie.clone();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/user/info").cookie(Cookie::new(cookie_name, "tok")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("carol name"));
        assert!(body.contains("Auditor"));
    }

    #[actix_web::test]
    async fn test_info_session_store_failure() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "erin").await;

        let sessions = MemorySessionStore::new();
        sessions.insert("tok", id);
        sessions.fail_with("store down");
        let mut state = state(&repo);
        state.sessions = Arc::new(sessions);
        let cookie_name = state.session_cookie.clone();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/user/info").cookie(Cookie::new(cookie_name, "tok")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "Session store error: store down");
        assert_eq!(repo.reads(), 0);
    }

    #[actix_web::test]
    async fn test_to_edit_and_role_assign_pages() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "dave").await;
        let app = app!(state(&repo));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri(&format!("/user/user_edit/{id}")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("dave@example.com"));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri(&format!("/user/role_assign/{id}")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_to_edit_bad_and_unknown_ids() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/user/user_edit/abc").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/user/role_assign/77").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_add_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let body = "account=erin&name=Erin&email=erin%40example.com&sex=2&password=pw&rePassword=pw";
        let resp = test::call_service(&app, form_post("/user/add", body).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "success");

        let user = repo.stored(1).unwrap();
        assert_eq!(user.account, "erin");
        assert_eq!(user.sex, Sex::Female);
        assert_ne!(user.password, "pw");
    }

    #[actix_web::test]
    async fn test_add_password_mismatch() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let body = "account=erin&name=Erin&password=pw&rePassword=pW";
        let resp = test::call_service(&app, form_post("/user/add", body).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "passwords do not match");
        assert_eq!(repo.writes(), 0);
    }

    #[actix_web::test]
    async fn test_edit_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "frank").await;
        let app = app!(state(&repo));

        let body = format!("id={id}&name=Franklin&email=&sex=0");
        let resp = test::call_service(&app, form_post("/user/edit", &body).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let user = repo.stored(id).unwrap();
        assert_eq!(user.name, "Franklin");
        assert_eq!(user.email, "");
        assert_eq!(user.sex, Sex::Unknown);
    }

    #[actix_web::test]
    async fn test_blank_sex_field() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "gina").await;
        let app = app!(state(&repo));

        let body = "account=hank&name=Hank&email=&sex=&password=pw&rePassword=pw";
        let resp = test::call_service(&app, form_post("/user/add", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(repo.stored(id + 1).unwrap().sex, Sex::Unknown);

        let body = format!("id={id}&name=Gina&email=&sex=");
        let resp = test::call_service(&app, form_post("/user/edit", &body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(repo.stored(id).unwrap().sex, Sex::Male);
    }

    #[actix_web::test]
    async fn test_non_numeric_sex_is_bad_request() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "ivan").await;
        let app = app!(state(&repo));
        let writes = repo.writes();

        let body = format!("id={id}&name=Ivan&sex=male");
        let resp = test::call_service(&app, form_post("/user/edit", &body).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(resp).await;
        assert!(json["error"].as_str().unwrap().starts_with("sex"));
        assert_eq!(repo.writes(), writes);
    }

    #[actix_web::test]
    async fn test_actions_require_user_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        for uri in ["/user/delete", "/user/reset", "/user/freeze", "/user/unfreeze", "/user/setRole"] {
            let resp = test::call_service(&app, form_post(uri, "userId=").to_request()).await;

            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let json: Value = test::read_body_json(resp).await;
            assert_eq!(json["message"], "invalid parameter", "{uri}");
        }

        assert_eq!(repo.reads(), 0);
        assert_eq!(repo.writes(), 0);
    }

    #[actix_web::test]
    async fn test_action_malformed_id() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp = test::call_service(&app, form_post("/user/freeze", "userId=x1").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(repo.writes(), 0);
    }

    #[actix_web::test]
    async fn test_freeze_unfreeze_flow() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "gina").await;
        let app = app!(state(&repo));

        let resp =
            test::call_service(&app, form_post("/user/freeze", &format!("userId={id}")).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(repo.stored(id).unwrap().status, UserStatus::Frozen);

        let resp =
            test::call_service(&app, form_post("/user/unfreeze", &format!("userId={id}")).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(repo.stored(id).unwrap().status, UserStatus::Active);
    }

    #[actix_web::test]
    async fn test_set_role() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "hank").await;
        let app = app!(state(&repo));

        let body = format!("userId={id}&roleIds=2%2C3");
        let resp = test::call_service(&app, form_post("/user/setRole", &body).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(repo.stored(id).unwrap().role_id, "2,3");
    }

    #[actix_web::test]
    async fn test_delete_unknown_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let app = app!(state(&repo));

        let resp = test::call_service(&app, form_post("/user/delete", "userId=404").to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "user not found");
    }

    #[actix_web::test]
    async fn test_reset_failure_uses_message_key() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let id = seed_user(&repo, "ivy").await;
        repo.fail_with("db down");
        let app = app!(state(&repo));

        let resp =
            test::call_service(&app, form_post("/user/reset", &format!("userId={id}")).to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["message"], "database error: db down");
    }
}
