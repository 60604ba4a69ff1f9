//! Application router configuration with protected and unprotected route definitions.

use std::path::Path;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post, put},
};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        list_accounts_endpoint,
    },
    auth::{auth_guard, get_current_user, log_in, log_out, register},
    endpoints,
    logging_middleware,
    profile::{get_profile, update_profile},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// If `static_dir` is given, files in it are served for any path outside of
/// `/api`, with `index.html` as the fallback for client-side routes.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register))
        .route(endpoints::LOG_IN, post(log_in));

    let protected_routes = Router::new()
        .route(endpoints::LOG_OUT, post(log_out))
        .route(endpoints::ME, get(get_current_user))
        .route(endpoints::PROFILE, get(get_profile).put(update_profile))
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            put(edit_account_endpoint).delete(delete_account_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let router = protected_routes
        .merge(unprotected_routes)
        .route("/api/{*path}", any(get_404_not_found));

    let router = match static_dir {
        Some(static_dir) => router.fallback_service(
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html"))),
        ),
        None => router.fallback(get_404_not_found),
    };

    router
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The JSON response for routes that do not exist.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "接口不存在 / Route not found" })),
    )
        .into_response()
}
