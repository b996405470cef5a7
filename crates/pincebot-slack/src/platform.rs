use async_trait::async_trait;
use pincebot_assistant::Answer;

use crate::error::SlackError;

/// Outbound chat operations the bot needs.
///
/// `ts` is a message timestamp; `thread_ts` is the root of the thread to post in.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError>;

    async fn remove_reaction(&self, channel: &str, ts: &str, name: &str)
        -> Result<(), SlackError>;

    /// Post a rendered answer with its related links and feedback buttons.
    async fn post_answer(
        &self,
        channel: &str,
        thread_ts: &str,
        answer: &Answer,
    ) -> Result<(), SlackError>;

    /// Post a short plain-text reply.
    async fn post_reply(&self, channel: &str, thread_ts: &str, text: &str)
        -> Result<(), SlackError>;
}
