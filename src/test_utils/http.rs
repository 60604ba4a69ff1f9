use axum_test::TestResponse;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_error_message(response: &TestResponse, message: &str) {
    let body = response.json::<Value>();

    assert_eq!(
        body["error"], message,
        "want error message {message:?}, got body {body}"
    );
}
