//! `SQLite` record store
//!
//! Timestamps are stored as Unix microseconds in an `INTEGER` column.

use async_trait::async_trait;
use chrono::DateTime;
use roster_core::{
    error::Result, Lookup, NewUser, RecordStore, RosterError, User, UserFilter, UserId,
};
use sqlx::SqlitePool;

const SCHEMA: &str = include_str!("../../schema/sqlite/users.sql");

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    age: i32,
    created_at: i64,
}

impl TryFrom<UserRow> for User {
    type Error = RosterError;

    fn try_from(row: UserRow) -> Result<Self> {
        let created_at = DateTime::from_timestamp_micros(row.created_at).ok_or_else(|| {
            RosterError::storage(format!("Invalid timestamp: {}", row.created_at))
        })?;

        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            age: row.age,
            created_at,
        })
    }
}

/// Record store backed by a `SQLite` pool
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Wrap an existing pool; the schema is not touched
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::schema(e.to_string()))?;

        tracing::debug!("SQLite schema ready");
        Ok(())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Lookup<User>> {
        let query = match filter {
            UserFilter::Name(name) => sqlx::query_as::<_, UserRow>(
                "SELECT id, name, age, created_at FROM users WHERE name = ? ORDER BY id LIMIT 1",
            )
            .bind(name),
            UserFilter::Id(id) => sqlx::query_as::<_, UserRow>(
                "SELECT id, name, age, created_at FROM users WHERE id = ?",
            )
            .bind(id.as_i64()),
        };

        let row = query.fetch_optional(&self.pool).await?;

        row.map(User::try_from).transpose().map(Lookup::from)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, age, created_at) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(user.age)
            .bind(user.created_at.timestamp_micros())
            .execute(&self.pool)
            .await?;

        Ok(user.with_id(UserId::new(result.last_insert_rowid())))
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET name = ?, age = ?, created_at = ? WHERE id = ?")
                .bind(&user.name)
                .bind(user.age)
                .bind(user.created_at.timestamp_micros())
                .bind(user.id.as_i64())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::not_found("User", user.id.to_string()));
        }

        Ok(())
    }
}
