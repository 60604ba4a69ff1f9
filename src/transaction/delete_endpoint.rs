//! Defines the endpoint for deleting a transaction.

use axum::{Extension, Json, extract::Path};
use serde_json::{Value, json};

use crate::{Error, auth::Caller, transaction::TransactionId};

/// A route handler for deleting a transaction owned by the caller.
///
/// Responds with 404 if the caller has no transaction with that ID.
pub async fn delete_transaction_endpoint(
    Extension(caller): Extension<Caller>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let rows_affected = caller
        .client
        .delete_transaction(&caller.user.id, &transaction_id)
        .await
        .map_err(|error| {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Error::from(error)
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(Json(json!({ "message": "Deleted" })))
}

#[cfg(test)]
mod tests {
    use crate::{
        account::Account,
        endpoints::{self, format_endpoint},
        test_utils::{
            auth_header, create_test_account, create_test_transaction, get_test_server,
            register_test_user,
        },
        transaction::Transaction,
    };

    #[tokio::test]
    async fn delete_removes_transaction_and_restores_balance() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;
        create_test_account(&server, &session, "现金", 100.0).await;
        let transaction = create_test_transaction(&server, &session, 40.0, "现金").await;

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, &transaction.id))
            .add_header("authorization", auth_header(&session))
            .await
            .assert_status_ok();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .await
            .json::<Vec<Transaction>>();
        let accounts = server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", auth_header(&session))
            .await
            .json::<Vec<Account>>();
        assert!(transactions.is_empty());
        assert_eq!(accounts[0].balance, 100.0);
    }

    #[tokio::test]
    async fn delete_other_users_transaction_deletes_nothing() {
        let server = get_test_server();
        let ann = register_test_user(&server, "ann@example.com", None).await;
        let bob = register_test_user(&server, "bob@example.com", None).await;
        let transaction = create_test_transaction(&server, &ann, 12.0, "").await;

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, &transaction.id))
            .add_header("authorization", auth_header(&bob))
            .await
            .assert_status_not_found();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&ann))
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions, vec![transaction]);
    }
}
