//! The route for logging out the current user.

use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::{Error, auth::Caller};

/// A route handler that revokes the caller's session at the store.
pub async fn log_out(Extension(caller): Extension<Caller>) -> Result<Json<Value>, Error> {
    caller.client.sign_out().await.map_err(|error| {
        tracing::error!("Could not log out user {}: {error}", caller.user.id);
        Error::from(error)
    })?;

    Ok(Json(json!({ "message": "已登出 / Logged out" })))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{auth_header, get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn log_out_revokes_token() {
        let server = get_test_server();
        let session = register_test_user(&server, "ann@example.com", None).await;

        let response = server
            .post(endpoints::LOG_OUT)
            .add_header("authorization", auth_header(&session))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({"message": "已登出 / Logged out"})
        );
        server
            .get(endpoints::ME)
            .add_header("authorization", auth_header(&session))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn log_out_only_revokes_own_session() {
        let server = get_test_server();
        let first = register_test_user(&server, "ann@example.com", None).await;
        let second = register_test_user(&server, "bob@example.com", None).await;

        server
            .post(endpoints::LOG_OUT)
            .add_header("authorization", auth_header(&first))
            .await
            .assert_status_ok();

        server
            .get(endpoints::ME)
            .add_header("authorization", auth_header(&second))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_out_requires_token() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_OUT)
            .await
            .assert_status_unauthorized();
    }
}
