/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Database URL names no supported backend
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for roster_core::RosterError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UnsupportedUrl(_) => {
                roster_core::RosterError::invalid_input(err.to_string())
            }
            StorageError::Io(e) => roster_core::RosterError::Io(e),
            other => roster_core::RosterError::storage(other.to_string()),
        }
    }
}
