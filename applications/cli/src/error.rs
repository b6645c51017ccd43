/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Roster(#[from] roster_core::RosterError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<roster_storage::StorageError> for CliError {
    fn from(err: roster_storage::StorageError) -> Self {
        // StorageError -> RosterError -> CliError
        CliError::Roster(err.into())
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
