/// Roster configuration
use crate::error::{CliError, Result};
use roster_storage::PoolSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_reconcile")]
    pub reconcile: ReconcileSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcileSettings {
    /// Name of the user to reconcile
    #[serde(default = "default_name")]
    pub name: String,

    /// Age given to the user when it has to be created
    #[serde(default = "default_age")]
    pub default_age: i32,
}

impl StorageSettings {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

impl RosterConfig {
    /// Load configuration from file and environment
    ///
    /// With no `path`, `roster.toml` in the working directory is used if it
    /// exists. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`RosterConfig::load`], reading variables from `env` instead of
    /// the process environment when it is given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. ROSTER_STORAGE__DATABASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("ROSTER")
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let config = settings.build()?;

        Ok(config.try_deserialize()?)
    }

    /// Apply command-line values on top of file and environment settings
    pub fn apply_overrides(
        &mut self,
        database_url: Option<String>,
        name: Option<String>,
        default_age: Option<i32>,
    ) {
        if let Some(database_url) = database_url {
            self.storage.database_url = database_url;
        }
        if let Some(name) = name {
            self.reconcile.name = name;
        }
        if let Some(default_age) = default_age {
            self.reconcile.default_age = default_age;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(CliError::Config(
                "database URL is required (set ROSTER_STORAGE__DATABASE_URL or POSTGRES_URL)"
                    .to_string(),
            ));
        }

        if self.storage.max_connections == 0 {
            return Err(CliError::Config(
                "storage.max_connections must be at least 1".to_string(),
            ));
        }

        if self.storage.acquire_timeout_secs == 0 {
            return Err(CliError::Config(
                "storage.acquire_timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.reconcile.name.trim().is_empty() {
            return Err(CliError::Config("reconcile.name must not be blank".to_string()));
        }

        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        max_connections: default_max_connections(),
        acquire_timeout_secs: default_acquire_timeout_secs(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/roster.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

fn default_reconcile() -> ReconcileSettings {
    ReconcileSettings {
        name: default_name(),
        default_age: default_age(),
    }
}

fn default_name() -> String {
    "Mary".to_string()
}

fn default_age() -> i32 {
    17
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            reconcile: default_reconcile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("roster.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        let err = RosterConfig::load_with_env(Some(&missing), env(&[])).unwrap_err();
        assert!(matches!(err, CliError::Config(msg) if msg.contains("nope.toml")));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = RosterConfig::default();
        assert_eq!(config.storage.database_url, "sqlite://./data/roster.db");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.reconcile.name, "Mary");
        assert_eq!(config.reconcile.default_age, 17);
        config.validate().unwrap();
    }

    #[test]
    fn test_file_then_env_precedence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("roster.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[storage]\ndatabase_url = \"sqlite://file.db\"\nmax_connections = 2\n\n[reconcile]\nname = \"John\""
        )
        .unwrap();

        let config = RosterConfig::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(config.storage.database_url, "sqlite://file.db");
        assert_eq!(config.storage.max_connections, 2);
        assert_eq!(config.reconcile.name, "John");
        assert_eq!(config.reconcile.default_age, 17);

        let config = RosterConfig::load_with_env(
            Some(&path),
            env(&[
                ("ROSTER_STORAGE__DATABASE_URL", "postgres://localhost/roster"),
                ("ROSTER_RECONCILE__DEFAULT_AGE", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(config.storage.database_url, "postgres://localhost/roster");
        assert_eq!(config.storage.max_connections, 2);
        assert_eq!(config.reconcile.default_age, 30);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RosterConfig::default();
        config.storage.database_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        let mut config = RosterConfig::default();
        config.storage.max_connections = 0;
        assert!(config.validate().is_err());

        let mut config = RosterConfig::default();
        config.storage.acquire_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(CliError::Config(msg)) if msg.contains("acquire_timeout")
        ));

        let mut config = RosterConfig::default();
        config.reconcile.name = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_strings_are_not_reinterpreted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = RosterConfig::load_with_env(
            Some(&write_config(&temp_dir, "")),
            env(&[
                ("ROSTER_RECONCILE__NAME", "007"),
                ("ROSTER_STORAGE__ACQUIRE_TIMEOUT_SECS", "12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.reconcile.name, "007");
        assert_eq!(config.storage.acquire_timeout_secs, 12);
    }

    #[test]
    fn test_overrides_beat_file_and_env() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &temp_dir,
            "[storage]\ndatabase_url = \"sqlite://file.db\"\n\n[reconcile]\nname = \"John\"\ndefault_age = 40",
        );
        let mut config = RosterConfig::load_with_env(
            Some(&path),
            env(&[
                ("ROSTER_STORAGE__DATABASE_URL", "sqlite://env.db"),
                ("ROSTER_RECONCILE__NAME", "Jane"),
                ("ROSTER_RECONCILE__DEFAULT_AGE", "30"),
            ]),
        )
        .unwrap();

        config.apply_overrides(
            Some("postgres://localhost/roster".to_string()),
            Some("Mary".to_string()),
            Some(17),
        );

        assert_eq!(config.storage.database_url, "postgres://localhost/roster");
        assert_eq!(config.reconcile.name, "Mary");
        assert_eq!(config.reconcile.default_age, 17);
    }

    #[test]
    fn test_absent_overrides_keep_loaded_values() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = RosterConfig::load_with_env(
            Some(&write_config(&temp_dir, "")),
            env(&[("ROSTER_RECONCILE__NAME", "Jane")]),
        )
        .unwrap();

        config.apply_overrides(None, None, None);

        assert_eq!(config.reconcile.name, "Jane");
        assert_eq!(config.reconcile.default_age, 17);
        assert_eq!(config.storage.database_url, "sqlite://./data/roster.db");
    }

    #[test]
    fn test_pool_settings_conversion() {
        let config = RosterConfig::default();
        let pool = config.storage.pool_settings();
        assert_eq!(pool.max_connections, 5);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(30));
    }
}
