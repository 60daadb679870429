use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::application::auth_service::{SESSION_COOKIE, SESSION_TTL_DAYS};
use crate::errors::AppError;
use crate::handlers::session::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub username: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .finish()
}

/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set"),
        (status = 401, description = "Invalid username or password"),
    ),
    tag = "admin"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();
    let auth = state.auth.clone();

    let token = web::block(move || auth.login(&username, &password)).await??;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(json!({ "success": true })))
}

/// POST /api/logout
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Session cookie cleared")),
    tag = "admin"
)]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true }))
}

/// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Signed-in admin", body = MeResponse),
        (status = 401, description = "Not signed in"),
    ),
    tag = "admin"
)]
pub async fn me(session: AdminSession) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        username: session.username,
    })
}

/// PUT /api/admin/password
#[utoipa::path(
    put,
    path = "/api/admin/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "New password too short"),
        (status = 401, description = "Not signed in or current password incorrect"),
    ),
    tag = "admin"
)]
pub async fn change_password(
    session: AdminSession,
    state: web::Data<AppState>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let current = body.current_password.unwrap_or_default();
    let new = body.new_password.unwrap_or_default();
    let auth = state.auth.clone();

    web::block(move || auth.change_password(&session.username, &current, &new)).await??;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
