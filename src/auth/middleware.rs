//! Authentication middleware that resolves the bearer token to a user.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    AppState, Error,
    store::{RemoteStore, StoreError, UserClient},
    user::User,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The store that issued the tokens.
    pub store: Arc<dyn RemoteStore>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// The authenticated caller of a request.
///
/// Inserted into the request extensions by [auth_guard].
#[derive(Clone)]
pub struct Caller {
    /// The user the bearer token belongs to.
    pub user: User,
    /// A store client that acts with the caller's token.
    pub client: Arc<dyn UserClient>,
}

/// Middleware function that checks for a valid `Authorization: Bearer` header.
///
/// If the store accepts the token, the request is executed with a [Caller] in
/// its extensions. Otherwise a 401 response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(caller): Extension<Caller>` to receive the caller.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let token =
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &state).await {
            Ok(TypedHeader(Authorization(bearer))) if !bearer.token().is_empty() => {
                bearer.token().to_owned()
            }
            _ => return Error::NotAuthenticated.into_response(),
        };

    let client: Arc<dyn UserClient> = Arc::from(state.store.with_token(&token));

    let user = match client.get_user().await {
        Ok(user) => user,
        Err(
            error @ (StoreError::Sql(_) | StoreError::DatabaseLock | StoreError::Hashing(_)),
        ) => return Error::from(error).into_response(),
        Err(error) => {
            tracing::debug!("Rejected bearer token: {error}");
            return Error::InvalidToken.into_response();
        }
    };

    parts.extensions.insert(Caller { user, client });
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
