use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::auth::Registration;
use crate::error::AppError;
use crate::{AppState, Result};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<()> {
        require_not_blank("username", &self.username)?;
        require_not_blank("password", &self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<BTreeSet<String>>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        require_not_blank("username", &self.username)?;
        require_length("username", &self.username, 3, 20)?;

        require_not_blank("email", &self.email)?;
        require_length("email", &self.email, 1, 50)?;
        if !looks_like_email(&self.email) {
            return Err(AppError::ValidationError("email must be a well-formed email address".into()));
        }

        require_not_blank("password", &self.password)?;
        require_length("password", &self.password, 6, 40)
    }
}

fn require_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be blank", field)));
    }
    Ok(())
}

fn require_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received login request for username: {}", req.username);
    req.validate()?;

    match state.auth_service.login(&req.username, &req.password).await {
        Ok(response) => {
            info!("Login successful for username: {}", req.username);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            warn!("Login failed for username: {}: {}", req.username, e);
            Err(e)
        }
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    info!("Received registration request for username: {}", req.username);
    req.validate()?;

    let req = req.into_inner();
    let username = req.username.clone();
    let registration = Registration {
        username: req.username,
        email: req.email,
        password: req.password,
        roles: req.role,
    };

    match state.auth_service.register(registration).await {
        Ok(response) => {
            info!("Registration successful for username: {}", username);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            warn!("Registration failed for username: {}: {}", username, e);
            Err(e)
        }
    }
}
