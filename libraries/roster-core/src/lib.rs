//! Roster Core
//!
//! Backend-agnostic domain types, the record store abstraction and the
//! user reconciliation routine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `NewUser`, `UserId`
//! - **Core Traits**: `RecordStore`, implemented by `roster-storage`
//! - **Reconciliation**: `reconcile`, the find-or-create-then-update routine
//! - **Error Handling**: Unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_core::{reconcile, RecordStore};
//!
//! # async fn example(store: &dyn RecordStore) -> roster_core::Result<()> {
//! store.ensure_schema().await?;
//!
//! let mary = reconcile(store, "Mary", 17).await?;
//! println!("{} is now {}", mary.name, mary.age);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reconcile;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use reconcile::reconcile;
pub use store::{Lookup, RecordStore, UserFilter};
pub use types::{NewUser, User, UserId};
