//! Record store abstraction

use crate::error::Result;
use crate::types::{NewUser, User, UserId};
use async_trait::async_trait;
use std::fmt;

/// Equality predicate for [`RecordStore::find_one`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Match on the natural key
    Name(String),
    /// Match on the surrogate key
    Id(UserId),
}

impl UserFilter {
    /// Match users by name
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for UserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name = {name:?}"),
            Self::Id(id) => write!(f, "id = {id}"),
        }
    }
}

/// Outcome of a single-record lookup
///
/// A miss is an expected result, kept apart from the `Err` side which is
/// reserved for failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A matching record
    Found(T),
    /// Nothing matched
    NotFound,
}

impl<T> Lookup<T> {
    /// Whether a record matched
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into an `Option`, dropping the distinction from errors
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

/// Persistent storage for user records
///
/// Implemented by the SQLite and PostgreSQL stores in `roster-storage`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the `users` table if it does not exist yet
    ///
    /// Safe to call any number of times.
    async fn ensure_schema(&self) -> Result<()>;

    /// Find the first user matching `filter`
    ///
    /// When several rows match, the one with the lowest id wins.
    async fn find_one(&self, filter: &UserFilter) -> Result<Lookup<User>>;

    /// Insert a user and return it with its assigned id
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Overwrite the stored row whose id matches `user.id`
    ///
    /// Returns [`crate::RosterError::NotFound`] if no such row exists.
    async fn update(&self, user: &User) -> Result<()>;
}
