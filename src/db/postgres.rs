use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::db::models::{NewUser, Role, RoleName, RoleRow, User, UserRow};
use crate::db::store::{RoleStore, UserStore};
use crate::error::{AppError, DatabaseError};
use crate::Result;

/// User and role store backed by PostgreSQL.
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::new_with_options(
            &config.url,
            config.max_connections,
            Duration::from_secs(config.acquire_timeout_secs),
        )
        .await
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string())))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Creates the tables and seeds the three roles if needed.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>> {
        Ok(self.pool.as_ref().begin().await?)
    }

    async fn roles_for_user(&self, user_id: i64) -> Result<BTreeSet<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter()
            .map(|row| Role::try_from(row).map_err(|e| AppError::DatabaseError(DatabaseError::QueryError(e))))
            .collect()
    }

    async fn save_with_transaction(
        &self,
        user: &NewUser,
        transaction: &mut Transaction<'_, Postgres>,
    ) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&mut **transaction)
        .await?;

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(id)
                .bind(role.id)
                .execute(&mut **transaction)
                .await?;
        }

        Ok(id)
    }
}

/// The save failure is what the caller needs; a failed rollback is only logged.
fn keep_original_error(rollback: std::result::Result<(), sqlx::Error>, original: AppError) -> AppError {
    if let Err(rollback_err) = rollback {
        error!("Rollback after failed save also failed: {}", rollback_err);
    }
    original
}

#[async_trait]
impl UserStore for PgStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some(row) => {
                let roles = self.roles_for_user(row.id).await?;
                Ok(Some(row.with_roles(roles)))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user: NewUser) -> Result<User> {
        let mut transaction = self.begin_transaction().await?;

        let result = self.save_with_transaction(&user, &mut transaction).await;

        match result {
            Ok(id) => {
                transaction.commit().await?;
                Ok(user.into_user(id))
            }
            Err(e) => Err(keep_original_error(transaction.rollback().await, e)),
        }
    }
}

#[async_trait]
impl RoleStore for PgStore {
    async fn find_by_name(&self, name: RoleName) -> Result<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Role::try_from)
            .transpose()
            .map_err(|e| AppError::DatabaseError(DatabaseError::QueryError(e)))
    }
}
