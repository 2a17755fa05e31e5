use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

use crate::auth::roles::resolve_requested_roles;
use crate::auth::{Authenticator, PasswordHasher, TokenIssuer};
use crate::db::{NewUser, RoleStore, UserStore};
use crate::error::{DatabaseError, RegistrationError};
use crate::Result;

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtResponse {
    pub token: String,
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Input to [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub roles: Option<BTreeSet<String>>,
}

/// Login and registration built from the stores, hasher, authenticator and token issuer.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    hasher: PasswordHasher,
    authenticator: Authenticator,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Result<Self> {
        let authenticator = Authenticator::new(users.clone(), hasher.clone())?;
        Ok(Self {
            users,
            roles,
            hasher,
            authenticator,
            tokens,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<JwtResponse> {
        let identity = self.authenticator.authenticate(username, password).await?;
        let token = self.tokens.issue(&identity)?;

        Ok(JwtResponse {
            token,
            id: identity.id,
            username: identity.username,
            email: identity.email,
            roles: identity.roles,
        })
    }

    pub async fn register(&self, registration: Registration) -> Result<MessageResponse> {
        if self.users.exists_by_username(&registration.username).await? {
            return Err(RegistrationError::UsernameTaken.into());
        }

        if self.users.exists_by_email(&registration.email).await? {
            return Err(RegistrationError::EmailInUse.into());
        }

        let password_hash = self.hasher.hash(&registration.password).await?;

        let mut roles = BTreeSet::new();
        for name in resolve_requested_roles(registration.roles.as_ref()) {
            let role = self.roles.find_by_name(name).await?.ok_or_else(|| {
                error!("Role {} is missing from the role store", name);
                DatabaseError::MissingRole(name)
            })?;
            roles.insert(role);
        }

        let user = self
            .users
            .save(NewUser::new(registration.username, registration.email, password_hash, roles))
            .await?;
        info!("Created user {} (id {}) with roles {:?}", user.username, user.id, user.role_names());

        Ok(MessageResponse::new(REGISTERED_MESSAGE))
    }
}
