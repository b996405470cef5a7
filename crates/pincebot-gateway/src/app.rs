use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use pincebot_aggregator::Aggregator;
use pincebot_slack::{EventRouter, FeedbackHandler};

/// Shared state passed as `Arc<AppState>` to all handlers.
pub struct AppState {
    /// Slack signing secret for request verification.
    pub signing_secret: String,
    pub aggregator: Aggregator,
    pub events: EventRouter,
    pub feedback: FeedbackHandler,
}

impl AppState {
    pub fn new(
        signing_secret: impl Into<String>,
        aggregator: Aggregator,
        events: EventRouter,
        feedback: FeedbackHandler,
    ) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            aggregator,
            events,
            feedback,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/slack/events", post(crate::http::events::events_handler))
        .route("/slack/actions", post(crate::http::actions::actions_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
