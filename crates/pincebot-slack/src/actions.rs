use std::sync::Arc;

use tracing::{debug, warn};

use crate::blocks::{FEEDBACK_NEGATIVE, FEEDBACK_POSITIVE};
use crate::events::BlockActionsPayload;
use crate::platform::ChatPlatform;

/// Reply text for a feedback button, `None` for actions this bot does not own.
pub fn feedback_reply(action_id: &str, support_team_id: Option<&str>) -> Option<String> {
    match action_id {
        FEEDBACK_POSITIVE => Some("Glad I could help! ✅".to_string()),
        FEEDBACK_NEGATIVE => {
            let tag = match support_team_id.filter(|id| !id.trim().is_empty()) {
                Some(id) => format!("<!subteam^{id}>"),
                None => "Support".to_string(),
            };
            Some(format!("Understood. Tagging {tag} for more help. 🛡️"))
        }
        _ => None,
    }
}

/// Handles feedback button clicks by replying in the answer's thread.
#[derive(Clone)]
pub struct FeedbackHandler {
    platform: Arc<dyn ChatPlatform>,
    support_team_id: Option<String>,
}

impl FeedbackHandler {
    pub fn new(platform: Arc<dyn ChatPlatform>, support_team_id: Option<String>) -> Self {
        Self {
            platform,
            support_team_id,
        }
    }

    /// Returns the number of replies posted.
    pub async fn handle(&self, payload: &BlockActionsPayload) -> usize {
        if payload.payload_type != "block_actions" {
            debug!(payload_type = %payload.payload_type, "ignoring interaction");
            return 0;
        }
        let (Some(channel), Some(thread_ts)) = (payload.channel_id(), payload.thread_ts()) else {
            warn!("block action without channel or thread");
            return 0;
        };

        let mut posted = 0;
        for action in &payload.actions {
            let Some(text) = feedback_reply(&action.action_id, self.support_team_id.as_deref())
            else {
                debug!(action_id = %action.action_id, "ignoring unknown action");
                continue;
            };
            match self.platform.post_reply(channel, thread_ts, &text).await {
                Ok(()) => posted += 1,
                Err(e) => warn!(channel, thread_ts, error = %e, "failed to post feedback reply"),
            }
        }
        posted
    }
}
