use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The closed set of roles a user can hold.
///
/// Variants are seeded by the migration and only ever looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoleName {
    User,
    Moderator,
    Admin,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::User, RoleName::Moderator, RoleName::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::User => "ROLE_USER",
            RoleName::Moderator => "ROLE_MODERATOR",
            RoleName::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown role name: {}", s))
    }
}

/// A seeded role record. Ordering follows the numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role {
    pub id: i32,
    pub name: RoleName,
}

impl Role {
    pub fn new(id: i32, name: RoleName) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct RoleRow {
    pub id: i32,
    pub name: String,
}

impl TryFrom<RoleRow> for Role {
    type Error = String;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role::new(row.id, row.name.parse()?))
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.name.to_string()).collect()
    }
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn with_roles(self, roles: BTreeSet<Role>) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            roles,
            created_at: self.created_at,
        }
    }
}

/// A user that has not been saved yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String, roles: BTreeSet<Role>) -> Self {
        Self {
            username,
            email,
            password_hash,
            roles,
            created_at: Utc::now(),
        }
    }

    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            roles: self.roles,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_round_trips_through_str() {
        for name in RoleName::ALL {
            assert_eq!(name.as_str().parse::<RoleName>().unwrap(), name);
        }
        assert!("ROLE_ROOT".parse::<RoleName>().is_err());
    }

    #[test]
    fn test_role_names_follow_role_ids() {
        let roles: BTreeSet<Role> = [
            Role::new(3, RoleName::Admin),
            Role::new(1, RoleName::User),
            Role::new(3, RoleName::Admin),
        ]
        .into_iter()
        .collect();

        let user = NewUser::new("alice".into(), "a@x.com".into(), "hash".into(), roles).into_user(7);
        assert_eq!(user.id, 7);
        assert_eq!(user.role_names(), vec!["ROLE_USER", "ROLE_ADMIN"]);
    }
}
