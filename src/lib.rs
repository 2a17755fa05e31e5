pub mod auth;
pub mod config;
pub mod content;
pub mod db;
pub mod error;

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::{web, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use auth::{AuthService, AuthenticatedIdentity, PasswordHasher, TokenIssuer};
pub use db::{MemoryStore, PgStore, RoleStore, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Mounts every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/auth")
                .route("/login", web::post().to(auth::handlers::login))
                .route("/register", web::post().to(auth::handlers::register)),
        )
        .service(
            web::scope("/api/test")
                .route("/all", web::get().to(content::all_access))
                .route("/user", web::get().to(content::user_access))
                .route("/mod", web::get().to(content::moderator_access))
                .route("/admin", web::get().to(content::admin_access)),
        );
}

pub fn cors(config: &crate::config::CorsConfig) -> Cors {
    if !config.enabled {
        // CORS disabled - use most restrictive settings
        return Cors::default();
    }

    let cors = if config.allow_any_origin {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["Authorization", "Content-Type"])
    };

    cors.max_age(config.max_age as usize)
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_service: Arc<AuthService>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(
        config: Settings,
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
    ) -> Result<Self> {
        let hasher = PasswordHasher::from_config(&config.auth)?;
        let tokens = Arc::new(TokenIssuer::from_config(&config.auth));
        let auth_service = AuthService::new(users, roles, hasher, tokens.clone())?;

        Ok(Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
            tokens,
        })
    }

    /// State over a fresh [`MemoryStore`] seeded with the standard roles.
    pub fn in_memory(config: Settings) -> Result<Self> {
        let store = Arc::new(MemoryStore::seeded());
        Self::new(config, store.clone(), store)
    }
}
