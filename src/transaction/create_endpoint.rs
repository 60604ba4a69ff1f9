//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};

use crate::{
    AppState, Error,
    auth::Caller,
    extract::ApiJson,
    timezone::today_in,
    transaction::{Transaction, TransactionRequest},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for recording a new transaction for the caller.
///
/// `type`, `amount` and `category` are required. The date defaults to today
/// in the server's timezone.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(caller): Extension<Caller>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let Some(today) = today_in(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Err(Error::InvalidTimezone(state.local_timezone));
    };

    let new_row = request.into_new_row(caller.user.id.clone(), today)?;

    let row = caller
        .client
        .insert_transaction(&new_row)
        .await
        .map_err(|error| {
            tracing::error!(
                "Could not create transaction for user {}: {error}",
                caller.user.id
            );
            Error::from(error)
        })?;

    Ok(Json(Transaction::from(row)))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        account::Account,
        endpoints,
        test_utils::{
            assert_error_message, auth_header, create_test_account, get_test_server,
            register_test_user,
        },
        timezone::today_in,
        transaction::{Transaction, TransactionKind},
    };

    #[tokio::test]
    async fn create_returns_transaction_with_time() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({
                "type": "expense",
                "amount": 85.2,
                "category": "餐饮",
                "categoryIcon": "restaurant",
                "categoryColor": "#fb923c",
                "date": "2026-02-26",
                "account": "招商银行",
                "note": "晚餐",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["type"], "expense");
        assert_eq!(body["amount"], 85.2);
        assert_eq!(body["categoryIcon"], "restaurant");
        assert_eq!(body["date"], "2026-02-26");
        assert_eq!(body["time"], "2026-02-26");
        assert_eq!(body["note"], "晚餐");
    }

    #[tokio::test]
    async fn create_defaults_date_to_today() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({"type": "income", "amount": 4200, "category": "薪资转帐"}))
            .await;

        response.assert_status_ok();
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.kind, TransactionKind::Income);
        assert_eq!(Some(transaction.date), today_in("Etc/UTC"));
        assert_eq!(transaction.category_icon, "");
        assert_eq!(transaction.account, "");
    }

    #[tokio::test]
    async fn create_requires_category() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({"type": "expense", "amount": 1}))
            .await;

        response.assert_status_bad_request();
        assert_error_message(&response, "缺少必填字段 / Missing required field: category");
    }

    #[tokio::test]
    async fn create_rejects_negative_amount() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({"type": "expense", "amount": -1, "category": "餐饮"}))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn create_moves_matching_account_balance() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;
        create_test_account(&server, &session, "现金", 100.0).await;

        server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({
                "type": "expense",
                "amount": 30,
                "category": "餐饮",
                "account": "现金",
            }))
            .await
            .assert_status_ok();

        let accounts = server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", auth_header(&session))
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts[0].balance, 70.0);
    }

    #[tokio::test]
    async fn create_moves_account_referenced_by_account_id() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;
        let cash = create_test_account(&server, &session, "现金", 100.0).await;
        create_test_account(&server, &session, "银行", 100.0).await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .add_header("authorization", auth_header(&session))
            .json(&json!({
                "type": "expense",
                "amount": 10,
                "category": "餐饮",
                "account": "银行",
                "account_id": cash.id,
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["account_id"], json!(cash.id));
        let accounts = server
            .get(endpoints::ACCOUNTS)
            .add_header("authorization", auth_header(&session))
            .await
            .json::<Vec<Account>>();
        let balances: Vec<(&str, f64)> = accounts
            .iter()
            .map(|account| (account.name.as_str(), account.balance))
            .collect();
        assert_eq!(balances, vec![("现金", 90.0), ("银行", 100.0)]);
    }
}
