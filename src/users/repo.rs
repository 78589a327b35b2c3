use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{Assignment, FieldValue, NewUser, SetClause, User};

/// Data access used by `UserService`. Every value is bound as a parameter.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn query_all(&self) -> anyhow::Result<Vec<User>>;
    async fn query_by_id(&self, user_id: i64) -> anyhow::Result<Vec<User>>;
    async fn query_by_email(&self, email: &str) -> anyhow::Result<Vec<User>>;
    /// Returns the number of inserted rows.
    async fn insert(&self, user: &NewUser) -> anyhow::Result<u64>;
    /// Applies `assignments` to the row keyed by `email`; returns affected rows.
    async fn update(&self, email: &str, assignments: &[Assignment]) -> anyhow::Result<u64>;
    async fn delete(&self, user_id: i64) -> anyhow::Result<u64>;
}

const USER_COLUMNS: &str = "user_id, email, password_hash, full_name, phone_number, address, \
     profile_picture_url, is_active, is_verified, created_at, updated_at";

/// `UserStore` over the Postgres `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn query_all(&self) -> anyhow::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id");
        let rows = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .context("select all users")?;
        Ok(rows)
    }

    async fn query_by_id(&self, user_id: i64) -> anyhow::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .context("select user by id")?;
        Ok(rows)
    }

    async fn query_by_email(&self, email: &str) -> anyhow::Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let rows = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .context("select user by email")?;
        Ok(rows)
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone_number, address,
                               profile_picture_url, is_active, is_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.profile_picture_url)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("insert user")?;
        Ok(result.rows_affected())
    }

    async fn update(&self, email: &str, assignments: &[Assignment]) -> anyhow::Result<u64> {
        let clause = SetClause::build(assignments);
        if clause.is_empty() {
            anyhow::bail!("update of {email} carries no assignments");
        }

        let sql = clause.to_sql();
        let mut query = sqlx::query(&sql);
        for value in clause.values {
            query = match value {
                FieldValue::Text(v) => query.bind(v),
                FieldValue::Flag(v) => query.bind(v),
                FieldValue::Timestamp(v) => query.bind(v),
            };
        }
        let result = query
            .bind(email)
            .execute(&self.pool)
            .await
            .context("update user by email")?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("delete user")?;
        Ok(result.rows_affected())
    }
}
