//! Bot-originated event filtering.
//!
//! Human messages always pass. For events carrying a `bot_id`:
//! - `own`: drop only this app's own bot id
//! - `listed`: drop the own bot id and every id in `ignore_bot_ids`
//! - `all`: drop every bot

use pincebot_core::config::{BotFilterConfig, BotFilterMode};

#[derive(Debug, Clone)]
pub struct BotFilter {
    mode: BotFilterMode,
    own_bot_id: Option<String>,
    ignore_bot_ids: Vec<String>,
}

impl BotFilter {
    pub fn new(config: &BotFilterConfig, own_bot_id: Option<String>) -> Self {
        Self {
            mode: config.mode,
            own_bot_id: own_bot_id.filter(|id| !id.trim().is_empty()),
            ignore_bot_ids: config.ignore_bot_ids.clone(),
        }
    }

    /// Returns `true` when the event must not reach the aggregator.
    pub fn ignores(&self, bot_id: Option<&str>) -> bool {
        let Some(bot_id) = bot_id.filter(|id| !id.is_empty()) else {
            return false;
        };
        let own = self.own_bot_id.as_deref() == Some(bot_id);
        match self.mode {
            BotFilterMode::Own => own,
            BotFilterMode::Listed => own || self.ignore_bot_ids.iter().any(|id| id == bot_id),
            BotFilterMode::All => true,
        }
    }
}
