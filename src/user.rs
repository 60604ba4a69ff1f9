//! The identity of an authenticated caller as reported by the remote store.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::money::null_to_default;

/// A newtype wrapper for user IDs issued by the remote store.
///
/// This helps disambiguate user IDs from account and transaction IDs, which
/// are also strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(String);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An authenticated user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the remote store.
    pub id: UserID,
    /// The email address the user registered with.
    #[serde(default, deserialize_with = "null_to_default")]
    pub email: String,
}
