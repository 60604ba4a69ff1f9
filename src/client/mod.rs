//! A typed client for the JSON API.
//!
//! Every authenticated call takes the caller's [Session] explicitly. The
//! session is only persisted through the [SessionStore] the client was built
//! with: registering or logging in saves it and logging out clears it.

mod session_store;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub use session_store::{FileSessionStore, MemorySessionStore, SESSION_FILE_NAME, SessionStore};

use crate::{
    account::{Account, AccountId, NewAccount},
    auth::{AuthResponse, Session},
    endpoints::{self, format_endpoint},
    profile::{Profile, ProfileUpdate},
    transaction::{NewTransaction, Transaction, TransactionId},
    user::User,
};

/// The address of a server running on this machine with the default port.
pub const DEFAULT_API_URL: &str = "http://localhost:7879";

/// Errors from calling the API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an error.
    ///
    /// `message` is the server's own message if it sent one.
    #[error("{message}")]
    Api {
        /// The HTTP status code, if one was received.
        status: Option<u16>,
        /// The error message to show the user.
        message: String,
    },

    /// The server could not be reached.
    #[error("网络错误 / Network error: {0}")]
    Network(String),

    /// The server answered with a body that could not be read.
    #[error("unexpected response from the server: {0}")]
    InvalidResponse(String),

    /// The session could not be read, written or removed.
    #[error("could not access the saved session: {0}")]
    SessionStore(String),

    /// There is no saved session.
    #[error("未登录 / Not logged in")]
    NotLoggedIn,
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ClientError::InvalidResponse(value.to_string())
        } else {
            ClientError::Network(value.to_string())
        }
    }
}

/// The calls the application makes to the API.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// The store the session is persisted in.
    fn sessions(&self) -> &dyn SessionStore;

    /// Register a new user and save the new session, if any.
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError>;

    /// Log in and save the new session.
    async fn log_in(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError>;

    /// Revoke the session at the server and clear the saved session.
    ///
    /// The saved session is cleared even if the server call fails.
    async fn log_out(&self, session: &Session) -> Result<(), ClientError>;

    /// The user the session belongs to.
    async fn current_user(&self, session: &Session) -> Result<User, ClientError>;

    /// The user's profile.
    async fn get_profile(&self, session: &Session) -> Result<Profile, ClientError>;

    /// Update the user's profile.
    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<Profile, ClientError>;

    /// The user's accounts, oldest first.
    async fn list_accounts(&self, session: &Session) -> Result<Vec<Account>, ClientError>;

    /// Create an account.
    async fn create_account(
        &self,
        session: &Session,
        account: &NewAccount,
    ) -> Result<Account, ClientError>;

    /// Replace the fields of an account.
    async fn update_account(
        &self,
        session: &Session,
        account: &Account,
    ) -> Result<Account, ClientError>;

    /// Delete an account.
    async fn delete_account(&self, session: &Session, id: &AccountId)
    -> Result<(), ClientError>;

    /// The user's transactions, newest first.
    async fn list_transactions(&self, session: &Session)
    -> Result<Vec<Transaction>, ClientError>;

    /// Record a transaction.
    async fn create_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError>;

    /// Replace the fields of a transaction.
    async fn update_transaction(
        &self,
        session: &Session,
        transaction: &Transaction,
    ) -> Result<Transaction, ClientError>;

    /// Delete a transaction.
    async fn delete_transaction(
        &self,
        session: &Session,
        id: &TransactionId,
    ) -> Result<(), ClientError>;
}

/// An HTTP client for a Tally server.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. [DEFAULT_API_URL].
    pub fn new(base_url: &str, sessions: impl SessionStore + 'static) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            sessions: Arc::new(sessions),
        }
    }

    /// The address of the server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let request = self
            .http
            .request(method, format!("{}{path}", self.base_url));

        match session {
            Some(session) => request.bearer_auth(&session.access_token),
            None => request,
        }
    }

    async fn authenticate(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<AuthResponse, ClientError> {
        let response = self.request(Method::POST, path, None).json(body).send().await?;
        let auth: AuthResponse = check(response).await?.json().await?;

        if let Some(session) = &auth.session {
            self.sessions.save(session)?;
        }

        Ok(auth)
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

#[async_trait]
impl LedgerApi for ApiClient {
    fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        self.authenticate(
            endpoints::REGISTER,
            &Credentials {
                email,
                password,
                name,
            },
        )
        .await
    }

    async fn log_in(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        self.authenticate(
            endpoints::LOG_IN,
            &Credentials {
                email,
                password,
                name: None,
            },
        )
        .await
    }

    async fn log_out(&self, session: &Session) -> Result<(), ClientError> {
        let result = match self
            .request(Method::POST, endpoints::LOG_OUT, Some(session))
            .send()
            .await
        {
            Ok(response) => check(response).await.map(|_| ()),
            Err(error) => Err(error.into()),
        };

        if let Err(error) = &result {
            tracing::warn!("Log out failed at the server: {error}");
        }

        self.sessions.clear()?;

        result
    }

    async fn current_user(&self, session: &Session) -> Result<User, ClientError> {
        let response: UserResponse = self.get(endpoints::ME, session).await?;

        Ok(response.user)
    }

    async fn get_profile(&self, session: &Session) -> Result<Profile, ClientError> {
        self.get(endpoints::PROFILE, session).await
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<Profile, ClientError> {
        self.send_json(Method::PUT, endpoints::PROFILE, session, update)
            .await
    }

    async fn list_accounts(&self, session: &Session) -> Result<Vec<Account>, ClientError> {
        self.get(endpoints::ACCOUNTS, session).await
    }

    async fn create_account(
        &self,
        session: &Session,
        account: &NewAccount,
    ) -> Result<Account, ClientError> {
        self.send_json(Method::POST, endpoints::ACCOUNTS, session, account)
            .await
    }

    async fn update_account(
        &self,
        session: &Session,
        account: &Account,
    ) -> Result<Account, ClientError> {
        let path = format_endpoint(endpoints::ACCOUNT, &account.id);

        self.send_json(Method::PUT, &path, session, account).await
    }

    async fn delete_account(
        &self,
        session: &Session,
        id: &AccountId,
    ) -> Result<(), ClientError> {
        self.delete(&format_endpoint(endpoints::ACCOUNT, id), session)
            .await
    }

    async fn list_transactions(
        &self,
        session: &Session,
    ) -> Result<Vec<Transaction>, ClientError> {
        self.get(endpoints::TRANSACTIONS, session).await
    }

    async fn create_transaction(
        &self,
        session: &Session,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        self.send_json(Method::POST, endpoints::TRANSACTIONS, session, transaction)
            .await
    }

    async fn update_transaction(
        &self,
        session: &Session,
        transaction: &Transaction,
    ) -> Result<Transaction, ClientError> {
        let path = format_endpoint(endpoints::TRANSACTION, &transaction.id);

        self.send_json(Method::PUT, &path, session, transaction)
            .await
    }

    async fn delete_transaction(
        &self,
        session: &Session,
        id: &TransactionId,
    ) -> Result<(), ClientError> {
        self.delete(&format_endpoint(endpoints::TRANSACTION, id), session)
            .await
    }
}

impl ApiClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
    ) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path, Some(session)).send().await?;

        Ok(check(response).await?.json().await?)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: &(impl Serialize + Sync),
    ) -> Result<T, ClientError> {
        let response = self
            .request(method, path, Some(session))
            .json(body)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, path: &str, session: &Session) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, path, Some(session))
            .send()
            .await?;

        check(response).await.map(|_| ())
    }
}

/// Turn a non-success response into [ClientError::Api].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|body| body.get("error")?.as_str().map(str::to_owned))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("请求失败 ({})", status.as_u16()));

    Err(ClientError::Api {
        status: Some(status.as_u16()),
        message,
    })
}
