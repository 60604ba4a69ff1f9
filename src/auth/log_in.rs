//! The route for logging in with an email and password.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthResponse, AuthState},
    extract::ApiJson,
    store::StoreError,
};

/// The JSON body for logging in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogInForm {
    /// The user's email address.
    #[serde(default)]
    pub email: String,
    /// The user's password.
    #[serde(default)]
    pub password: String,
}

/// A route handler for logging in a user.
///
/// If the store rejects the credentials, a 401 response carrying the store's
/// message is returned.
pub async fn log_in(
    State(state): State<AuthState>,
    ApiJson(form): ApiJson<LogInForm>,
) -> Result<Json<AuthResponse>, Error> {
    if form.email.is_empty() || form.password.is_empty() {
        return Err(Error::MissingCredentials);
    }

    let response = state
        .store
        .sign_in(&form.email, &form.password)
        .await
        .map_err(|error| match error {
            error @ (StoreError::Sql(_) | StoreError::DatabaseLock | StoreError::Hashing(_)) => {
                Error::from(error)
            }
            error => {
                tracing::info!("Log in failed: {error}");
                Error::LogInFailed(error.to_string())
            }
        })?;

    Ok(Json(response))
}
