//! Tally is a personal finance tracker: accounts, income and expenses, and
//! statistics about where the money goes.
//!
//! This library provides:
//! - a JSON API gateway that authenticates callers with bearer tokens and
//!   forwards their requests to a remote store ([build_router]),
//! - the remote stores themselves, hosted ([store::SupabaseStore]) or
//!   embedded ([store::SqliteStore]),
//! - a typed client for the API ([client::ApiClient]),
//! - the client-side application state ([shell::AppShell]),
//! - and the aggregations behind the statistics views ([stats]).

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod account;
mod app_state;
pub mod auth;
pub mod category;
pub mod client;
pub mod config;
pub mod endpoints;
mod extract;
mod logging;
pub mod money;
pub mod profile;
mod routing;
pub mod shell;
pub mod stats;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod timezone;
pub mod transaction;
pub mod user;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, init_tracing, logging_middleware};
pub use routing::build_router;

use crate::store::StoreError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that the API gateway reports to its clients.
///
/// Every error is sent as a JSON body of the form `{"error": "<message>"}`.
/// Messages meant for end users are bilingual.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email or password was missing or empty.
    #[error("请输入邮箱和密码 / Email and password required")]
    MissingCredentials,

    /// A required field was missing from the request body.
    #[error("缺少必填字段 / Missing required field: {0}")]
    MissingField(&'static str),

    /// A field in the request body had an invalid value.
    #[error("字段无效 / Invalid field {field}: {reason}")]
    InvalidField {
        /// The name of the field.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// An update request did not contain any field that can be updated.
    #[error("没有需要更新的字段 / No fields to update")]
    EmptyUpdate,

    /// The request body could not be parsed.
    #[error("请求格式错误 / Invalid request body: {0}")]
    InvalidBody(String),

    /// The `Authorization: Bearer` header was missing or malformed.
    #[error("未登录 / Not authenticated")]
    NotAuthenticated,

    /// The remote store did not accept the bearer token.
    #[error("无效的令牌 / Invalid token")]
    InvalidToken,

    /// The remote store rejected the email and password.
    ///
    /// The string is the store's explanation.
    #[error("{0}")]
    LogInFailed(String),

    /// The row does not exist or is not owned by the caller.
    #[error("记录不存在 / Record not found")]
    NotFound,

    /// The remote store rejected the request.
    ///
    /// The string is the store's explanation and is passed on to the client.
    #[error("{0}")]
    Store(String),

    /// An unexpected error occurred inside the server.
    ///
    /// The string should only be logged. The client is sent a generic message.
    #[error("an unexpected error occurred: {0}")]
    Internal(String),

    /// The server's timezone setting is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),
}

impl Error {
    /// The HTTP status code the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCredentials
            | Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::EmptyUpdate
            | Error::InvalidBody(_)
            | Error::Store(_) => StatusCode::BAD_REQUEST,
            Error::NotAuthenticated | Error::InvalidToken | Error::LogInFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Internal(_) | Error::InvalidTimezone(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Error::NotFound,
            error @ (StoreError::Sql(_) | StoreError::DatabaseLock | StoreError::Hashing(_)) => {
                Error::Internal(error.to_string())
            }
            error => Error::Store(error.to_string()),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(value: JsonRejection) -> Self {
        Error::InvalidBody(value.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Error::Internal(error) => {
                tracing::error!("An unexpected error occurred: {error}");
                "服务器内部错误 / Internal server error".to_owned()
            }
            Error::InvalidTimezone(timezone) => {
                tracing::error!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                );
                "服务器时区配置无效 / Invalid server timezone".to_owned()
            }
            error => error.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{Error, store::StoreError};

    #[test]
    fn store_not_found_is_not_found() {
        assert_eq!(Error::from(StoreError::NotFound), Error::NotFound);
    }

    #[test]
    fn store_rejection_keeps_message() {
        let error = Error::from(StoreError::Rejected {
            status: 422,
            message: "User already registered".to_owned(),
        });

        assert_eq!(error, Error::Store("User already registered".to_owned()));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn lock_errors_are_internal() {
        let error = Error::from(StoreError::DatabaseLock);

        assert!(matches!(error, Error::Internal(_)));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(
            Error::NotAuthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(Error::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::InvalidToken.to_string(), "无效的令牌 / Invalid token");
    }
}
