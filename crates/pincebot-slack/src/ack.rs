//! Processing marker: a reaction on the message that started an aggregation,
//! shown while the answer is pending and removed if no answer is posted.
//!
//! Reaction failures (missing scope, deleted message) are logged and swallowed.

use std::sync::Arc;

use tracing::warn;

use crate::platform::ChatPlatform;

#[derive(Clone)]
pub struct ProcessingMarker {
    platform: Arc<dyn ChatPlatform>,
    reaction: String,
}

impl ProcessingMarker {
    pub fn new(platform: Arc<dyn ChatPlatform>, reaction: impl Into<String>) -> Self {
        Self {
            platform,
            reaction: reaction.into(),
        }
    }

    pub fn reaction(&self) -> &str {
        &self.reaction
    }

    pub async fn mark(&self, channel: &str, ts: &str) {
        if let Err(e) = self.platform.add_reaction(channel, ts, &self.reaction).await {
            warn!(channel, ts, error = %e, "failed to add processing reaction");
        }
    }

    pub async fn clear(&self, channel: &str, ts: &str) {
        if let Err(e) = self.platform.remove_reaction(channel, ts, &self.reaction).await {
            warn!(channel, ts, error = %e, "failed to remove processing reaction");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingPlatform};

    #[tokio::test]
    async fn mark_and_clear_use_configured_reaction() {
        let platform = Arc::new(RecordingPlatform::default());
        let marker = ProcessingMarker::new(platform.clone(), "hourglass");
        marker.mark("C1", "1.0").await;
        marker.clear("C1", "1.0").await;
        assert_eq!(
            platform.calls(),
            vec![
                Call::AddReaction {
                    channel: "C1".into(),
                    ts: "1.0".into(),
                    name: "hourglass".into()
                },
                Call::RemoveReaction {
                    channel: "C1".into(),
                    ts: "1.0".into(),
                    name: "hourglass".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let platform = Arc::new(RecordingPlatform::failing());
        let marker = ProcessingMarker::new(platform.clone(), "eyes");
        marker.mark("C1", "1.0").await;
        marker.clear("C1", "1.0").await;
        assert_eq!(platform.calls().len(), 2);
    }
}
