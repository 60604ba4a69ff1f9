//! Defines the endpoint for listing the caller's transactions.

use axum::{Extension, Json};

use crate::{Error, auth::Caller, transaction::Transaction};

/// A route handler for listing the caller's transactions, newest first.
pub async fn list_transactions_endpoint(
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let rows = caller
        .client
        .list_transactions(&caller.user.id)
        .await
        .map_err(|error| {
            tracing::error!(
                "Could not list transactions for user {}: {error}",
                caller.user.id
            );
            Error::from(error)
        })?;

    Ok(Json(rows.into_iter().map(Transaction::from).collect()))
}
