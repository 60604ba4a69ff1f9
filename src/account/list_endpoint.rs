//! Defines the endpoint for listing the caller's accounts.

use axum::{Extension, Json};

use crate::{Error, account::Account, auth::Caller};

/// A route handler for listing the caller's accounts, oldest first.
pub async fn list_accounts_endpoint(
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<Account>>, Error> {
    let rows = caller
        .client
        .list_accounts(&caller.user.id)
        .await
        .map_err(|error| {
            tracing::error!("Could not list accounts for user {}: {error}", caller.user.id);
            Error::from(error)
        })?;

    Ok(Json(rows.into_iter().map(Account::from).collect()))
}
