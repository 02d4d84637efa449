//! User handlers
//!
//! HTTP handler functions for the `/user` scope. Handlers bind request
//! parameters into forms, call [`UserService`](crate::user::service::UserService)
//! and answer with a rendered page or a JSON body.

use crate::auth::session::{SessionError, SessionUser};
use crate::state::AppState;
use crate::templates::{
    CONTAINER_VIEW, USER_ADD_VIEW, USER_EDIT_VIEW, USER_HOME_VIEW, USER_ROLE_ASSIGN_VIEW,
};
use crate::user::dto::{parse_id, SetRoleForm, UserAddForm, UserEditForm, UserFilter, UserIdForm};
use crate::user::error::{ActionError, UserError};
use crate::utils::response_handler::ResponseHandler;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use minijinja::context;

/// User management page
pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, UserError> {
    ResponseHandler::page(state.templates.as_ref(), USER_HOME_VIEW, context! {})
}

async fn list_users(state: &AppState, filter: &UserFilter) -> Result<HttpResponse, UserError> {
    let query = filter.to_query()?;
    let users = state.users.list(&query).await?;
    Ok(ResponseHandler::data(users))
}

/// Filtered user list submitted as a form
pub async fn list(
    state: web::Data<AppState>,
    form: web::Form<UserFilter>,
) -> Result<HttpResponse, UserError> {
    list_users(&state, &form).await
}

/// Filtered user list from the query string
pub async fn list_query(
    state: web::Data<AppState>,
    query: web::Query<UserFilter>,
) -> Result<HttpResponse, UserError> {
    list_users(&state, &query).await
}

/// Profile of the logged-in user
pub async fn info(
    state: web::Data<AppState>,
    session: Result<SessionUser, SessionError>,
) -> actix_web::Result<HttpResponse> {
    let SessionUser(user_id) = match session {
        Ok(user) => user,
        Err(SessionError::Missing) => {
            let page = ResponseHandler::page_with_status(
                state.templates.as_ref(),
                CONTAINER_VIEW,
                context! { error => SessionError::Missing.to_string() },
                StatusCode::UNAUTHORIZED,
            )?;
            return Ok(page);
        },
        Err(err) => return Err(err.into()),
    };

    let user_role = state.users.get_user_role(user_id).await?;
    let page = ResponseHandler::page(
        state.templates.as_ref(),
        CONTAINER_VIEW,
        context! { user => &user_role.user, roleName => user_role.role_name() },
    )?;

    Ok(page)
}

/// Registration form page
pub async fn to_add(state: web::Data<AppState>) -> Result<HttpResponse, UserError> {
    ResponseHandler::page(state.templates.as_ref(), USER_ADD_VIEW, context! {})
}

/// Profile edit page
pub async fn to_edit(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, UserError> {
    let id = parse_id(&path)?;
    let user_role = state.users.get_user_role(id).await?;

    ResponseHandler::page(
        state.templates.as_ref(),
        USER_EDIT_VIEW,
        context! { user => &user_role.user, roleName => user_role.role_name() },
    )
}

/// Role assignment page
pub async fn to_role_assign(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, UserError> {
    let id = parse_id(&path)?;
    let user = state.users.get_user(id).await?;

    ResponseHandler::page(state.templates.as_ref(), USER_ROLE_ASSIGN_VIEW, context! { user => &user })
}

/// Create a user
pub async fn add(
    state: web::Data<AppState>,
    form: web::Form<UserAddForm>,
) -> Result<HttpResponse, UserError> {
    state.users.add_user(form.into_inner()).await?;
    Ok(ResponseHandler::success())
}

/// Update a user's profile
pub async fn edit(
    state: web::Data<AppState>,
    form: web::Form<UserEditForm>,
) -> Result<HttpResponse, UserError> {
    let (id, changes) = form.to_changes()?;
    state.users.edit_user(id, changes).await?;
    Ok(ResponseHandler::success())
}

/// Delete a user
pub async fn delete(
    state: web::Data<AppState>,
    form: web::Form<UserIdForm>,
) -> Result<HttpResponse, ActionError> {
    state.users.delete_user(form.user_id()?).await?;
    Ok(ResponseHandler::success())
}

/// Reset a user's password to the default one
pub async fn reset(
    state: web::Data<AppState>,
    form: web::Form<UserIdForm>,
) -> Result<HttpResponse, ActionError> {
    state.users.reset_password(form.user_id()?).await?;
    Ok(ResponseHandler::success())
}

/// Replace a user's role list
pub async fn set_role(
    state: web::Data<AppState>,
    form: web::Form<SetRoleForm>,
) -> Result<HttpResponse, ActionError> {
    let (id, role_ids) = form.validate()?;
    state.users.set_role(id, role_ids).await?;
    Ok(ResponseHandler::success())
}

/// Freeze a user
pub async fn freeze(
    state: web::Data<AppState>,
    form: web::Form<UserIdForm>,
) -> Result<HttpResponse, ActionError> {
    state.users.freeze(form.user_id()?).await?;
    Ok(ResponseHandler::success())
}

/// Unfreeze a user
pub async fn unfreeze(
    state: web::Data<AppState>,
    form: web::Form<UserIdForm>,
) -> Result<HttpResponse, ActionError> {
    state.users.unfreeze(form.user_id()?).await?;
    Ok(ResponseHandler::success())
}
