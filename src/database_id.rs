//! Database ID types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// A newtype wrapper for the integer ID of a user that can log in.
///
/// Every app with a log-in keeps its own user table, but they all key
/// sessions on this type. Keeping it distinct from [DatabaseId] stops an
/// employee or doctor ID from being used where a session user is expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(DatabaseId);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: DatabaseId) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
