//! Helpers shared by the route handler tests.

mod http;

use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState,
    account::Account,
    auth::{AuthResponse, Session},
    build_router, endpoints,
    store::SqliteStore,
    transaction::Transaction,
};

pub(crate) use http::assert_error_message;

/// The password every test user registers with.
pub(crate) const TEST_PASSWORD: &str = "hunter22";

/// App state backed by a fresh in-memory store.
pub(crate) fn get_test_state() -> AppState {
    let store = SqliteStore::open_in_memory()
        .expect("Could not create in-memory store")
        .with_password_cost(4);

    AppState::new(store, "Etc/UTC").expect("Could not create app state")
}

/// A test server for the full router with an empty in-memory store.
pub(crate) fn get_test_server() -> TestServer {
    TestServer::try_new(build_router(get_test_state(), None)).expect("Could not create test server.")
}

/// Serve the full router on a random local port and return its base URL.
///
/// The server runs until the test's runtime shuts down.
pub(crate) async fn spawn_test_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let address = listener
        .local_addr()
        .expect("Could not get test listener address");
    let router = build_router(get_test_state(), None);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    format!("http://{address}")
}

/// Register a user through the API and return their session.
pub(crate) async fn register_test_user(
    server: &TestServer,
    email: &str,
    name: Option<&str>,
) -> Session {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({"email": email, "password": TEST_PASSWORD, "name": name}))
        .await;

    response.assert_status_ok();
    response
        .json::<AuthResponse>()
        .session
        .expect("registration should return a session")
}

/// The `Authorization` header value for `session`.
pub(crate) fn auth_header(session: &Session) -> String {
    session.bearer()
}

/// Create an account through the API.
pub(crate) async fn create_test_account(
    server: &TestServer,
    session: &Session,
    name: &str,
    balance: f64,
) -> Account {
    let response = server
        .post(endpoints::ACCOUNTS)
        .add_header("authorization", auth_header(session))
        .json(&json!({"name": name, "balance": balance}))
        .await;

    response.assert_status_ok();
    response.json()
}

/// Create an expense through the API, recorded against the account named `account`.
pub(crate) async fn create_test_transaction(
    server: &TestServer,
    session: &Session,
    amount: f64,
    account: &str,
) -> Transaction {
    let response = server
        .post(endpoints::TRANSACTIONS)
        .add_header("authorization", auth_header(session))
        .json(&json!({
            "type": "expense",
            "amount": amount,
            "category": "餐饮",
            "categoryIcon": "restaurant",
            "categoryColor": "#fb923c",
            "date": "2026-02-26",
            "account": account,
        }))
        .await;

    response.assert_status_ok();
    response.json()
}
