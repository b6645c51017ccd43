/// User domain type
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw primary key
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw primary key
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted user
///
/// Only a record store produces values of this type, so `id` is always the
/// key the store assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate key
    pub id: UserId,

    /// Display name, used as the natural lookup key
    pub name: String,

    /// Age in years
    pub age: i32,

    /// Creation timestamp, set once on insert
    pub created_at: DateTime<Utc>,
}

/// A user that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Initial age
    pub age: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Create an unsaved user stamped with the current UTC time
    ///
    /// The timestamp is truncated to microseconds, the finest resolution
    /// every supported backend stores.
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Attach the key assigned by the store
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            age: self.age,
            created_at: self.created_at,
        }
    }
}
