//! The route for registering a new user.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    auth::{AuthResponse, AuthState},
    extract::ApiJson,
    store::SignUp,
};

/// The JSON body for registering a user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    /// The email address to register.
    #[serde(default)]
    pub email: String,
    /// The password.
    #[serde(default)]
    pub password: String,
    /// The display name. Defaults to the part of the email before the '@'.
    #[serde(default)]
    pub name: Option<String>,
}

/// A route handler for registering a new user.
///
/// The response holds the new user and their session. The session is `null`
/// when the store requires the email address to be confirmed first.
pub async fn register(
    State(state): State<AuthState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<Json<AuthResponse>, Error> {
    if form.email.is_empty() || form.password.is_empty() {
        return Err(Error::MissingCredentials);
    }

    let name = form
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| default_name(&form.email).to_owned());

    let response = state
        .store
        .sign_up(&SignUp {
            email: form.email,
            password: form.password,
            name,
        })
        .await
        .map_err(|error| {
            tracing::warn!("Could not register user: {error}");
            Error::from(error)
        })?;

    Ok(Json(response))
}

fn default_name(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
