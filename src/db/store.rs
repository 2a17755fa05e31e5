use async_trait::async_trait;

use crate::db::models::{NewUser, Role, RoleName, User};
use crate::Result;

/// Persistent collection of user records.
///
/// Implementations own uniqueness of username and email; a save that would
/// break it fails with `DatabaseError::Duplicate`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn save(&self, user: NewUser) -> Result<User>;
}

/// Read-only lookup of the seeded roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_name(&self, name: RoleName) -> Result<Option<Role>>;
}
