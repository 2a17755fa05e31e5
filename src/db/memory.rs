use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::db::models::{NewUser, Role, RoleName, User};
use crate::db::store::{RoleStore, UserStore};
use crate::error::DatabaseError;
use crate::Result;

/// In-process user and role store.
///
/// Enforces the same uniqueness rules as the database schema under a single
/// write lock.
pub struct MemoryStore {
    users: RwLock<HashMap<i64, User>>,
    roles: Vec<Role>,
}

impl MemoryStore {
    /// A store holding the given roles and no users.
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            roles: roles.into_iter().collect(),
        }
    }

    /// A store seeded with the three standard roles, ids matching the migration.
    pub fn seeded() -> Self {
        Self::with_roles([
            Role::new(1, RoleName::User),
            Role::new(2, RoleName::Moderator),
            Role::new(3, RoleName::Admin),
        ])
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(DatabaseError::Duplicate.into());
        }

        let id = users.keys().max().copied().unwrap_or(0) + 1;
        let user = user.into_user(id);
        users.insert(id, user.clone());

        Ok(user)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_name(&self, name: RoleName) -> Result<Option<Role>> {
        Ok(self.roles.iter().find(|r| r.name == name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::collections::BTreeSet;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser::new(
            username.to_string(),
            email.to_string(),
            "hash".to_string(),
            BTreeSet::from([Role::new(1, RoleName::User)]),
        )
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let store = MemoryStore::seeded();

        let first = store.save(new_user("alice", "a@x.com")).await.unwrap();
        let second = store.save(new_user("bob", "b@x.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(store.exists_by_username("alice").await.unwrap());
        assert!(store.exists_by_email("b@x.com").await.unwrap());
        assert!(!store.exists_by_username("carol").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicates() {
        let store = MemoryStore::seeded();
        store.save(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.save(new_user("alice", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(DatabaseError::Duplicate)));

        let err = store.save(new_user("other", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DatabaseError(DatabaseError::Duplicate)));

        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_role_lookup() {
        let store = MemoryStore::with_roles([Role::new(1, RoleName::User)]);

        assert_eq!(
            store.find_by_name(RoleName::User).await.unwrap(),
            Some(Role::new(1, RoleName::User))
        );
        assert_eq!(store.find_by_name(RoleName::Admin).await.unwrap(), None);
    }
}
