//! Subcommand implementations

use crate::config::StorageSettings;
use crate::error::Result;
use clap::ValueEnum;
use roster_core::{RecordStore, User};

/// How `reconcile` prints the resulting user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Connect to the configured database and make sure the schema exists
pub async fn open_store(storage: &StorageSettings) -> Result<Box<dyn RecordStore>> {
    let store = roster_storage::connect(&storage.database_url, &storage.pool_settings()).await?;
    store.ensure_schema().await?;

    tracing::info!("Database ready");

    Ok(store)
}

/// `roster init`
pub async fn init(storage: &StorageSettings) -> Result<()> {
    open_store(storage).await?;
    Ok(())
}

/// `roster reconcile`: returns the rendered post-update user
pub async fn reconcile(
    storage: &StorageSettings,
    name: &str,
    default_age: i32,
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(storage).await?;
    let user = roster_core::reconcile(store.as_ref(), name, default_age).await?;

    render(&user, format)
}

pub fn render(user: &User, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "{name}'s ID is: {id}\n{name}'s age is: {age}",
            name = user.name,
            id = user.id,
            age = user.age
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(user)?),
    }
}
