//! Defines the endpoint for updating an account.

use axum::{Extension, Json, extract::Path};

use crate::{
    Error,
    account::{Account, AccountId, AccountRequest},
    auth::Caller,
    extract::ApiJson,
};

/// A route handler for updating an account owned by the caller.
///
/// Fields missing from the body are left unchanged. Responds with 404 if the
/// caller has no account with that ID.
pub async fn edit_account_endpoint(
    Extension(caller): Extension<Caller>,
    Path(account_id): Path<AccountId>,
    ApiJson(request): ApiJson<AccountRequest>,
) -> Result<Json<Account>, Error> {
    let changes = request.into_changes()?;
    if changes.is_empty() {
        return Err(Error::EmptyUpdate);
    }

    let row = caller
        .client
        .update_account(&caller.user.id, &account_id, &changes)
        .await
        .map_err(|error| {
            tracing::warn!("Could not update account {account_id}: {error}");
            Error::from(error)
        })?;

    Ok(Json(Account::from(row)))
}
