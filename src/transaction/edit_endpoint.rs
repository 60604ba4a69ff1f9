//! Defines the endpoint for updating a transaction.

use axum::{Extension, Json, extract::Path};

use crate::{
    Error,
    auth::Caller,
    extract::ApiJson,
    transaction::{Transaction, TransactionId, TransactionRequest},
};

/// A route handler for updating a transaction owned by the caller.
///
/// Fields missing from the body are left unchanged. Responds with 404 if the
/// caller has no transaction with that ID.
pub async fn edit_transaction_endpoint(
    Extension(caller): Extension<Caller>,
    Path(transaction_id): Path<TransactionId>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let changes = request.into_changes()?;
    if changes.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    let row = caller
        .client
        .update_transaction(&caller.user.id, &transaction_id, &changes)
        .await
        .map_err(|error| {
            tracing::warn!("Could not update transaction {transaction_id}: {error}");
            Error::from(error)
        })?;

    Ok(Json(Transaction::from(row)))
}
