//! POST /slack/actions: interactivity ingress (feedback buttons).
//!
//! The body is `application/x-www-form-urlencoded` with a single `payload`
//! field holding JSON.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use pincebot_slack::events::BlockActionsPayload;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use super::{authenticate, bad_request};
use crate::app::AppState;

pub async fn actions_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    authenticate(&headers, &body, &state.signing_secret)?;

    let raw = std::str::from_utf8(&body).map_err(|_| bad_request("body is not UTF-8"))?;
    let json = form_field(raw, "payload").ok_or_else(|| bad_request("missing payload field"))?;
    let payload = BlockActionsPayload::from_json(&json).map_err(|e| {
        warn!(error = %e, "invalid interactivity payload");
        bad_request("invalid payload")
    })?;

    let feedback = state.feedback.clone();
    tokio::spawn(async move {
        feedback.handle(&payload).await;
    });
    Ok(Json(json!({"ok": true})))
}

/// Decode one field of a urlencoded form body.
pub fn form_field(body: &str, name: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != name {
            return None;
        }
        // form encoding writes spaces as '+'
        let value = value.replace('+', " ");
        urlencoding::decode(&value).ok().map(|v| v.into_owned())
    })
}
