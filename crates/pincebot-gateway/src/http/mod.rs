pub mod actions;
pub mod events;
pub mod health;
pub mod signature;

use axum::{
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

/// Reject requests that do not carry a fresh, valid Slack signature.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
) -> Result<(), (StatusCode, Json<Value>)> {
    let now = chrono::Utc::now().timestamp();
    signature::verify_slack_signature(headers, body, secret, now).map_err(|e| {
        warn!(reason = %e, "slack request authentication failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "authentication failed", "code": e.code()})),
        )
    })
}

pub(crate) fn bad_request(reason: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "bad request", "reason": reason})),
    )
}
