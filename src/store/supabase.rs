//! A remote store backed by a hosted Supabase project.
//!
//! Authentication goes through the GoTrue endpoints under `/auth/v1` and rows
//! through the PostgREST endpoints under `/rest/v1`. Every row request carries
//! the caller's own access token so that the project's row-level security
//! policies apply.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    account::{AccountChanges, AccountId, AccountRow, NewAccountRow},
    auth::{AuthResponse, Session},
    profile::{Profile, ProfileUpdate},
    store::{RemoteStore, SignUp, StoreError, UserClient},
    transaction::{NewTransactionRow, TransactionChanges, TransactionId, TransactionRow},
    user::{User, UserID},
};

/// A client for a Supabase project's auth and REST APIs.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    http: Client,
    url: String,
    anon_key: String,
}

impl SupabaseStore {
    /// Create a store for the project at `url`, e.g. "https://abc.supabase.co".
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self::with_client(Client::new(), url, anon_key)
    }

    /// Create a store that sends requests with `http`.
    pub fn with_client(http: Client, url: &str, anon_key: &str) -> Self {
        Self {
            http,
            url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.to_owned(),
        }
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.url)
    }
}

/// The body GoTrue sends back when it issues a session.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl From<TokenResponse> for AuthResponse {
    fn from(response: TokenResponse) -> Self {
        let mut session = Session::new(response.access_token, response.refresh_token);
        if let Some(token_type) = response.token_type {
            session.token_type = token_type;
        }
        session.expires_in = response.expires_in;
        session.expires_at = response.expires_at;

        AuthResponse {
            user: response.user,
            session: Some(session),
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl RemoteStore for SupabaseStore {
    async fn sign_up(&self, credentials: &SignUp) -> Result<AuthResponse, StoreError> {
        let response = self
            .http
            .post(self.auth_endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "data": { "name": credentials.name },
            }))
            .send()
            .await?;

        let body: Value = check(response).await?.json().await?;

        // Without a session, e.g. when email confirmation is on, GoTrue
        // responds with the bare user.
        if body.get("access_token").is_some() {
            let token: TokenResponse = from_value(body)?;
            return Ok(token.into());
        }

        let user = match body.get("user") {
            Some(user) => from_value(user.clone())?,
            None => from_value(body)?,
        };

        Ok(AuthResponse {
            user,
            session: None,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, StoreError> {
        let response = self
            .http
            .post(self.auth_endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let token: TokenResponse = check(response).await?.json().await?;

        Ok(token.into())
    }

    fn with_token(&self, access_token: &str) -> Box<dyn UserClient> {
        Box::new(SupabaseUserClient {
            store: self.clone(),
            access_token: access_token.to_owned(),
        })
    }
}

/// A Supabase client that sends the caller's access token with every request.
struct SupabaseUserClient {
    store: SupabaseStore,
    access_token: String,
}

impl SupabaseUserClient {
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.store.anon_key)
            .bearer_auth(&self.access_token)
    }

    fn table(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.authorized(
            self.store
                .http
                .request(method, format!("{}/rest/v1/{table}", self.store.url)),
        )
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Send a write and return the first row it affected.
    async fn fetch_first<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        self.fetch_rows(request.header("Prefer", "return=representation"))
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_rows(
        &self,
        table: &str,
        user_id: &UserID,
        id: &str,
    ) -> Result<usize, StoreError> {
        let deleted: Vec<Value> = self
            .fetch_rows(
                self.table(reqwest::Method::DELETE, table)
                    .query(&[("id", eq(id)), ("user_id", eq(user_id.as_str()))])
                    .header("Prefer", "return=representation"),
            )
            .await?;

        Ok(deleted.len())
    }
}

#[async_trait]
impl UserClient for SupabaseUserClient {
    async fn get_user(&self) -> Result<User, StoreError> {
        let response = self
            .authorized(self.store.http.get(self.store.auth_endpoint("user")))
            .send()
            .await?;

        match check(response).await {
            Ok(response) => Ok(response.json().await?),
            Err(StoreError::Rejected { message, .. }) => Err(StoreError::Unauthorized(message)),
            Err(error) => Err(error),
        }
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let response = self
            .authorized(self.store.http.post(self.store.auth_endpoint("logout")))
            .query(&[("scope", "local")])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserID) -> Result<Profile, StoreError> {
        self.fetch_rows(
            self.table(reqwest::Method::GET, "profiles")
                .query(&[("select", "*".to_owned()), ("id", eq(user_id.as_str()))]),
        )
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound)
    }

    async fn update_profile(
        &self,
        user_id: &UserID,
        update: &ProfileUpdate,
    ) -> Result<Profile, StoreError> {
        self.fetch_first(
            self.table(reqwest::Method::PATCH, "profiles")
                .query(&[("id", eq(user_id.as_str()))])
                .json(update),
        )
        .await
    }

    async fn list_accounts(&self, user_id: &UserID) -> Result<Vec<AccountRow>, StoreError> {
        self.fetch_rows(self.table(reqwest::Method::GET, "accounts").query(&[
            ("select", "*".to_owned()),
            ("user_id", eq(user_id.as_str())),
            ("order", "created_at.asc".to_owned()),
        ]))
        .await
    }

    async fn insert_account(&self, account: &NewAccountRow) -> Result<AccountRow, StoreError> {
        self.fetch_first(self.table(reqwest::Method::POST, "accounts").json(account))
            .await
    }

    async fn update_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
        changes: &AccountChanges,
    ) -> Result<AccountRow, StoreError> {
        self.fetch_first(
            self.table(reqwest::Method::PATCH, "accounts")
                .query(&[("id", eq(account_id)), ("user_id", eq(user_id.as_str()))])
                .json(changes),
        )
        .await
    }

    async fn delete_account(
        &self,
        user_id: &UserID,
        account_id: &AccountId,
    ) -> Result<usize, StoreError> {
        self.delete_rows("accounts", user_id, account_id).await
    }

    async fn list_transactions(
        &self,
        user_id: &UserID,
    ) -> Result<Vec<TransactionRow>, StoreError> {
        self.fetch_rows(self.table(reqwest::Method::GET, "transactions").query(&[
            ("select", "*".to_owned()),
            ("user_id", eq(user_id.as_str())),
            ("order", "created_at.desc".to_owned()),
        ]))
        .await
    }

    async fn insert_transaction(
        &self,
        transaction: &NewTransactionRow,
    ) -> Result<TransactionRow, StoreError> {
        self.fetch_first(self.table(reqwest::Method::POST, "transactions").json(transaction))
            .await
    }

    async fn update_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
        changes: &TransactionChanges,
    ) -> Result<TransactionRow, StoreError> {
        self.fetch_first(
            self.table(reqwest::Method::PATCH, "transactions")
                .query(&[
                    ("id", eq(transaction_id)),
                    ("user_id", eq(user_id.as_str())),
                ])
                .json(changes),
        )
        .await
    }

    async fn delete_transaction(
        &self,
        user_id: &UserID,
        transaction_id: &TransactionId,
    ) -> Result<usize, StoreError> {
        self.delete_rows("transactions", user_id, transaction_id)
            .await
    }
}

/// A PostgREST equality filter.
fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|error| StoreError::InvalidResponse(error.to_string()))
}

/// Turn an error status into a [StoreError] carrying the store's message.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body, status);

    tracing::debug!("Supabase responded with {status}: {body}");

    Err(match status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthorized(message),
        status => StoreError::Rejected {
            status: status.as_u16(),
            message,
        },
    })
}

/// Pick the human readable message out of an error body.
///
/// GoTrue and PostgREST disagree on where the message goes, so the first of
/// `msg`, `message`, `error_description` and `error` wins.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_owned))
    });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_owned(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_owned(),
    }
}
