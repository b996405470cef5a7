//! POST /slack/events: Events API ingress.
//!
//! Slack expects an answer within three seconds, so events are acknowledged
//! immediately and routed on a spawned task.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use pincebot_slack::events::EventEnvelope;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{authenticate, bad_request};
use crate::app::AppState;

const RETRY_HEADER: &str = "x-slack-retry-num";

pub async fn events_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    authenticate(&headers, &body, &state.signing_secret)?;

    // the original delivery was accepted; a retry would double-ingest
    if let Some(retry) = headers.get(RETRY_HEADER).and_then(|v| v.to_str().ok()) {
        info!(retry, "dropping Slack retry");
        return Ok(Json(json!({"ok": true})));
    }

    let envelope: EventEnvelope = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "invalid Events API body");
        bad_request("invalid JSON body")
    })?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("answering url_verification challenge");
            Ok(Json(json!({ "challenge": challenge })))
        }
        EventEnvelope::EventCallback { event_id, event } => {
            debug!(event_id = ?event_id, "event callback received");
            let router = state.events.clone();
            tokio::spawn(async move {
                router.route(event).await;
            });
            Ok(Json(json!({"ok": true})))
        }
        EventEnvelope::Unsupported => {
            debug!("ignoring unsupported envelope type");
            Ok(Json(json!({"ok": true})))
        }
    }
}
