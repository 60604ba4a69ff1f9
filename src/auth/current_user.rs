use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::auth::Caller;

/// A route handler for getting the user the bearer token belongs to.
pub async fn get_current_user(Extension(caller): Extension<Caller>) -> Json<Value> {
    Json(json!({ "user": caller.user }))
}
