//! `PostgreSQL` record store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{
    error::Result, Lookup, NewUser, RecordStore, RosterError, User, UserFilter, UserId,
};
use sqlx::PgPool;

const SCHEMA: &str = include_str!("../../schema/postgres/users.sql");

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    age: i32,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            name: row.name,
            age: row.age,
            created_at: row.created_at,
        }
    }
}

/// Record store backed by a `PostgreSQL` pool
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Wrap an existing pool; the schema is not touched
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::schema(e.to_string()))?;

        tracing::debug!("PostgreSQL schema ready");
        Ok(())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Lookup<User>> {
        let query = match filter {
            UserFilter::Name(name) => sqlx::query_as::<_, UserRow>(
                "SELECT id, name, age, created_at FROM users WHERE name = $1 ORDER BY id LIMIT 1",
            )
            .bind(name),
            UserFilter::Id(id) => sqlx::query_as::<_, UserRow>(
                "SELECT id, name, age, created_at FROM users WHERE id = $1",
            )
            .bind(id.as_i64()),
        };

        let row = query.fetch_optional(&self.pool).await?;

        Ok(row.map(User::from).into())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, age, created_at) VALUES ($1, $2, $3)
             RETURNING id, name, age, created_at",
        )
        .bind(&user.name)
        .bind(user.age)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET name = $1, age = $2, created_at = $3 WHERE id = $4")
                .bind(&user.name)
                .bind(user.age)
                .bind(user.created_at)
                .bind(user.id.as_i64())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::not_found("User", user.id.to_string()));
        }

        Ok(())
    }
}
