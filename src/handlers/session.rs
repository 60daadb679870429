use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::application::auth_service::SESSION_COOKIE;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor for handlers that require a signed-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

fn authenticate(req: &HttpRequest) -> Result<AdminSession, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;
    let cookie = req
        .cookie(SESSION_COOKIE)
        .ok_or_else(|| DomainError::Unauthorized("Unauthorized".to_string()))?;
    let claims = state.auth.keys().validate(cookie.value())?;
    Ok(AdminSession {
        username: claims.sub,
    })
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
