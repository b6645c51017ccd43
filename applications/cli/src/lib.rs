//! Roster CLI Library
//!
//! Configuration, store wiring and output rendering behind the `roster`
//! binary. Exposed as a library so the commands can be tested directly.

pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::OutputFormat;
pub use config::RosterConfig;
pub use error::{CliError, Result};
