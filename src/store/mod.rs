//! The remote store: authentication and per-user row storage.
//!
//! The gateway never talks to a database directly. Every request is forwarded
//! to a [UserClient] that is built fresh for the caller's bearer token, so that
//! the store can enforce its own row-level access rules on top of the
//! `user_id` filters the gateway adds.

mod sqlite;
mod supabase;

use async_trait::async_trait;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

use crate::{
    account::{AccountChanges, AccountId, AccountRow, NewAccountRow},
    auth::AuthResponse,
    profile::{Profile, ProfileUpdate},
    transaction::{NewTransactionRow, TransactionChanges, TransactionId, TransactionRow},
    user::{User, UserID},
};

/// Errors reported by a remote store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the request. `message` is the store's explanation.
    #[error("{message}")]
    Rejected {
        /// The HTTP status code the store responded with.
        status: u16,
        /// The store's error message.
        message: String,
    },

    /// The credentials or token were rejected.
    #[error("{0}")]
    Unauthorized(String),

    /// No row matched the query.
    #[error("the requested row could not be found")]
    NotFound,

    /// The store could not be reached.
    #[error("could not reach the remote store: {0}")]
    Network(String),

    /// The store responded with something that could not be understood.
    #[error("unexpected response from the remote store: {0}")]
    InvalidResponse(String),

    /// An unhandled SQL error in the embedded store.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// Password hashing failed.
    #[error("hashing failed: {0}")]
    Hashing(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                StoreError::Sql(error)
            }
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            StoreError::InvalidResponse(value.to_string())
        } else {
            StoreError::Network(value.to_string())
        }
    }
}

/// The credentials for registering a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    /// The email address to register.
    pub email: String,
    /// The raw password.
    pub password: String,
    /// The display name stored on the new profile.
    pub name: String,
}

/// The unauthenticated entry point of a remote store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Register a new user.
    ///
    /// The returned session is `None` when the store requires the email
    /// address to be confirmed before the user can log in.
    async fn sign_up(&self, credentials: &SignUp) -> Result<AuthResponse, StoreError>;

    /// Log in with an email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, StoreError>;

    /// Create a client that acts on behalf of the holder of `access_token`.
    fn with_token(&self, access_token: &str) -> Box<dyn UserClient>;
}

/// A store client scoped to one caller's bearer token.
///
/// Every row operation also takes the caller's user ID and must only ever
/// touch rows owned by that user.
#[async_trait]
pub trait UserClient: Send + Sync {
    /// The user the token belongs to.
    ///
    /// # Errors
    /// Returns [StoreError::Unauthorized] if the token is invalid or expired.
    async fn get_user(&self) -> Result<User, StoreError>;

    /// Revoke the session the token belongs to.
    async fn sign_out(&self) -> Result<(), StoreError>;

    /// Get the user's profile.
    async fn get_profile(&self, user_id: &UserID) -> Result<Profile, StoreError>;

    /// Apply `update` to the user's profile and return the new profile.
    async fn update_profile(
        &self,
        user_id: &UserID,
        update: &ProfileUpdate,
    ) -> Result<Profile, StoreError>;

    /// The user's accounts, oldest first.
    async fn list_accounts(&self, user_id: &UserID) -> Result<Vec<AccountRow>, StoreError>;

    /// Insert a new account row.
    async fn insert_account(&self, account: &NewAccountRow) -> Result<AccountRow, StoreError>;

    /// Update an account owned by the user.
    ///
    /// # Errors
    /// Returns [StoreError::NotFound] if the user has no account with that ID.
    async fn update_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> Result<AccountRow, StoreError>;

    /// Delete an account owned by the user, returning the number of rows deleted.
    async fn delete_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
    ) -> Result<usize, StoreError>;

    /// The user's transactions, newest first.
    async fn list_transactions(&self, user_id: &UserID)
    -> Result<Vec<TransactionRow>, StoreError>;

    /// Insert a new transaction row.
    async fn insert_transaction(
        &self,
        transaction: &NewTransactionRow,
    ) -> Result<TransactionRow, StoreError>;

    /// Update a transaction owned by the user.
    ///
    /// # Errors
    /// Returns [StoreError::NotFound] if the user has no transaction with that ID.
    async fn update_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
        changes: &TransactionChanges,
    ) -> Result<TransactionRow, StoreError>;

    /// Delete a transaction owned by the user, returning the number of rows deleted.
    async fn delete_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
    ) -> Result<usize, StoreError>;
}
