//! The session tokens issued by the remote store.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// The access and refresh tokens issued to a logged-in user.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The short-lived bearer token sent with every request.
    pub access_token: String,
    /// The token used to obtain a new access token.
    pub refresh_token: String,
    /// Always "bearer".
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Seconds until the access token expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// When the access token expires, as a Unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Session {
    /// Create a session from a pair of tokens.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            expires_in: None,
            expires_at: None,
        }
    }

    /// The value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Tokens must never end up in the logs.
impl Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"********")
            .field("refresh_token", &"********")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// The response to a successful registration or log in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user.
    pub user: User,
    /// The new session, or `None` if the user must confirm their email first.
    pub session: Option<Session>,
}
