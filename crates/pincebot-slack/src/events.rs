//! Serde models for the two inbound Slack payloads: Events API callbacks and
//! interactivity (`block_actions`) submissions. Only the fields the bot reads
//! are modelled; everything else is ignored.

use serde::Deserialize;

use crate::error::SlackError;

/// Outer body of a POST to the Events API endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Sent once when the request URL is configured; must be echoed back.
    UrlVerification { challenge: String },
    EventCallback {
        #[serde(default)]
        event_id: Option<String>,
        event: SlackEvent,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEvent {
    AppMention(MessageEvent),
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

/// Shared shape of `app_mention` and `message` events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: String,
    pub thread_ts: Option<String>,
    pub bot_id: Option<String>,
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
    pub subtype: Option<String>,
}

impl MessageEvent {
    /// Thread root: `thread_ts` for replies, the message itself otherwise.
    pub fn thread_root(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

/// Interactivity payload for button clicks.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockActionsPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
    pub channel: Option<ChannelRef>,
    pub container: Option<Container>,
    pub message: Option<ContainerMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Container {
    pub channel_id: Option<String>,
    pub message_ts: Option<String>,
    pub thread_ts: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerMessage {
    pub ts: String,
    pub thread_ts: Option<String>,
}

impl BlockActionsPayload {
    /// Parse the form-decoded `payload` field of an interactivity request.
    pub fn from_json(raw: &str) -> Result<Self, SlackError> {
        serde_json::from_str(raw).map_err(|e| SlackError::Payload(e.to_string()))
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel
            .as_ref()
            .map(|c| c.id.as_str())
            .or_else(|| self.container.as_ref()?.channel_id.as_deref())
    }

    /// Thread the clicked message lives in.
    pub fn thread_ts(&self) -> Option<&str> {
        let container = self.container.as_ref();
        container
            .and_then(|c| c.thread_ts.as_deref())
            .or_else(|| self.message.as_ref()?.thread_ts.as_deref())
            .or_else(|| self.message.as_ref().map(|m| m.ts.as_str()))
            .or_else(|| container?.message_ts.as_deref())
    }
}
