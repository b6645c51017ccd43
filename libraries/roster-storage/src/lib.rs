//! Roster Storage
//!
//! `SQLite` and `PostgreSQL` implementations of the record store used by
//! the reconciler.
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_storage::{connect, PoolSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = connect("sqlite://roster.db", &PoolSettings::default()).await?;
//! store.ensure_schema().await?;
//!
//! let mary = roster_core::reconcile(store.as_ref(), "Mary", 17).await?;
//! # Ok(())
//! # }
//! ```

mod error;

pub mod postgres;
pub mod sqlite;

pub use error::StorageError;
pub use postgres::PostgresRecordStore;
pub use sqlite::SqliteRecordStore;

use roster_core::RecordStore;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

/// Connection pool settings shared by both backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// How long to wait for a free connection before failing
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Database backend, chosen from the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `sqlite:` URLs
    Sqlite,
    /// `postgres:` and `postgresql:` URLs
    Postgres,
}

impl Backend {
    /// Pick the backend for a connection URL
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::UnsupportedUrl`] for any scheme other than
    /// `sqlite:`, `postgres:` or `postgresql:`
    pub fn from_url(database_url: &str) -> error::Result<Self> {
        let scheme = database_url
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        match scheme.as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(StorageError::UnsupportedUrl(scheme)),
        }
    }
}

/// Open a record store for `database_url`
///
/// The schema is not touched; call [`RecordStore::ensure_schema`] before
/// using the store.
///
/// # Errors
///
/// Returns an error if the URL is unsupported or the connection fails
pub async fn connect(
    database_url: &str,
    settings: &PoolSettings,
) -> error::Result<Box<dyn RecordStore>> {
    let backend = Backend::from_url(database_url)?;
    tracing::debug!(?backend, "Connecting record store");

    let store: Box<dyn RecordStore> = match backend {
        Backend::Sqlite => Box::new(SqliteRecordStore::new(
            create_sqlite_pool(database_url, settings).await?,
        )),
        Backend::Postgres => Box::new(PostgresRecordStore::new(
            create_postgres_pool(database_url, settings).await?,
        )),
    };

    Ok(store)
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://roster.db>`)
/// * `settings` - Pool size and acquire timeout
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_sqlite_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> error::Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.acquire_timeout);

    // Every in-memory connection is its own database, so keep exactly one alive
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(settings.acquire_timeout);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        pool_options = pool_options.max_connections(settings.max_connections);

        let parent = options.get_filename().parent();
        if let Some(dir) = parent.filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!(in_memory, "SQLite pool created");

    Ok(pool)
}

/// Create a new `PostgreSQL` pool
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_postgres_pool(
    database_url: &str,
    settings: &PoolSettings,
) -> error::Result<PgPool> {
    use sqlx::postgres::PgPoolOptions;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    tracing::debug!(
        max_connections = settings.max_connections,
        "PostgreSQL pool created"
    );

    Ok(pool)
}
