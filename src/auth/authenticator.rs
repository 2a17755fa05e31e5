use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::auth::PasswordHasher;
use crate::db::{User, UserStore};
use crate::error::AuthError;
use crate::Result;

/// The verified caller of a request. Passed explicitly; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Authority names, one per role (`ROLE_USER`, ...).
    pub roles: Vec<String>,
}

impl AuthenticatedIdentity {
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.roles.iter().any(|r| roles.contains(&r.as_str()))
    }
}

impl From<&User> for AuthenticatedIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.role_names(),
        }
    }
}

/// Checks username/password pairs against the user store.
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    // Verified against when the username is unknown so both paths cost one hash
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self> {
        let dummy_hash = hasher.hash_blocking("dummy-password-for-unknown-users")?;
        Ok(Self {
            users,
            hasher,
            dummy_hash,
        })
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthenticatedIdentity> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                debug!("No user named {}", username);
                self.hasher.verify(password, &self.dummy_hash).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            debug!("Password mismatch for {}", username);
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(AuthenticatedIdentity::from(&user))
    }
}
