//! Defines the endpoint for deleting an account.

use axum::{Extension, Json, extract::Path};
use serde_json::{Value, json};

use crate::{Error, account::AccountId, auth::Caller};

/// A route handler for deleting an account owned by the caller.
///
/// Responds with 404 if the caller has no account with that ID.
pub async fn delete_account_endpoint(
    Extension(caller): Extension<Caller>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Value>, Error> {
    let rows_affected = caller
        .client
        .delete_account(&caller.user.id, &account_id)
        .await
        .map_err(|error| {
            tracing::error!("Could not delete account {account_id}: {error}");
            Error::from(error)
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({ "message": "Deleted" })))
}
