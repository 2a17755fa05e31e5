use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::AuthenticatedIdentity;
use crate::error::{AppError, AuthError};
use crate::{AppState, Result};

/// Extracts the caller from an `Authorization: Bearer <token>` header.
impl FromRequest for AuthenticatedIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}

fn identity_from_request(req: &HttpRequest) -> Result<AuthenticatedIdentity> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("application state is not configured".into()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;

    let claims = state.tokens.decode(token)?;
    Ok(claims.into())
}
