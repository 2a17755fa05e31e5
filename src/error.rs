use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

use crate::db::RoleName;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error(transparent)]
    RegistrationError(#[from] RegistrationError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Unique violations surface as Duplicate so registration races lose cleanly
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::DatabaseError(DatabaseError::NotFound),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::DatabaseError(DatabaseError::Duplicate)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::DatabaseError(DatabaseError::ConnectionError(err.to_string()))
            }
            _ => AppError::DatabaseError(DatabaseError::QueryError(err.to_string())),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::DatabaseError(DatabaseError::QueryError(err.to_string()))
    }
}

// Add conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthError(AuthError::TokenExpired)
            }
            _ => AppError::AuthError(AuthError::InvalidToken),
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::InternalError(format!("password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("blocking task failed: {}", err))
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        // Registration conflicts are part of the public contract and carry a bare message
        if let AppError::RegistrationError(_) = self {
            return HttpResponse::build(status).json(json!({ "message": message }));
        }

        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": message
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
            },
            AppError::RegistrationError(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(DatabaseError::Duplicate) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Error: Username is already taken!")]
    UsernameTaken,

    #[error("Error: Email is already in use!")]
    EmailInUse,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Role {0} is not found")]
    MissingRole(RoleName),
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use std::io;

    #[test]
    fn test_error_conversion() {
        // Test IO error conversion
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::InternalError(_)));

        // Test config error conversion
        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::ConfigError(_)));

        // Test database error conversion
        let db_err = sqlx::Error::RowNotFound;
        let app_err: AppError = db_err.into();
        assert!(matches!(app_err, AppError::DatabaseError(DatabaseError::NotFound)));

        let jwt_err: jsonwebtoken::errors::Error =
            jsonwebtoken::errors::ErrorKind::ExpiredSignature.into();
        let app_err: AppError = jwt_err.into();
        assert!(matches!(app_err, AppError::AuthError(AuthError::TokenExpired)));

        let jwt_err: jsonwebtoken::errors::Error =
            jsonwebtoken::errors::ErrorKind::InvalidSignature.into();
        let app_err: AppError = jwt_err.into();
        assert!(matches!(app_err, AppError::AuthError(AuthError::InvalidToken)));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::AuthError(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = AppError::AuthError(AuthError::Forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = AppError::RegistrationError(RegistrationError::UsernameTaken);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::ValidationError("invalid input".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::DatabaseError(DatabaseError::MissingRole(RoleName::Admin));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::DatabaseError(DatabaseError::Duplicate);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError("test error".to_string());
        assert_eq!(err.to_string(), "Validation error: test error");

        let err = AppError::AuthError(AuthError::InvalidCredentials);
        assert_eq!(err.to_string(), "Authentication error: Invalid credentials");

        let err = AppError::RegistrationError(RegistrationError::EmailInUse);
        assert_eq!(err.to_string(), "Error: Email is already in use!");

        let err = AppError::DatabaseError(DatabaseError::MissingRole(RoleName::Moderator));
        assert_eq!(err.to_string(), "Database error: Role ROLE_MODERATOR is not found");
    }

    #[actix_web::test]
    async fn test_registration_error_body_is_bare_message() {
        let resp = AppError::from(RegistrationError::UsernameTaken).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "message": "Error: Username is already taken!" }));
    }

    #[actix_web::test]
    async fn test_auth_error_body_is_nested() {
        let resp = AppError::from(AuthError::InvalidCredentials).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["status"], 401);
        assert_eq!(json["error"]["message"], "Authentication error: Invalid credentials");
    }
}
