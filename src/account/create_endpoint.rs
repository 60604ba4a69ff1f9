//! Defines the endpoint for creating a new account.

use axum::{Extension, Json};

use crate::{
    Error,
    account::{Account, AccountRequest},
    auth::Caller,
    extract::ApiJson,
};

/// A route handler for creating a new account owned by the caller.
///
/// Only `name` is required, every other field falls back to a default.
pub async fn create_account_endpoint(
    Extension(caller): Extension<Caller>,
    ApiJson(request): ApiJson<AccountRequest>,
) -> Result<Json<Account>, Error> {
    let new_row = request.into_new_row(caller.user.id.clone())?;

    let row = caller
        .client
        .insert_account(&new_row)
        .await
        .map_err(|error| {
            tracing::error!("Could not create account for user {}: {error}", caller.user.id);
            Error::from(error)
        })?;

    Ok(Json(Account::from(row)))
}
