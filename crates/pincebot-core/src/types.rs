use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one chat thread: the channel plus the thread root timestamp.
///
/// A top-level mention uses its own `ts` as the thread, so follow-ups posted
/// in the thread it spawns map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub channel: String,
    pub thread: String,
}

impl ConversationKey {
    pub fn new(channel: impl Into<String>, thread: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            thread: thread.into(),
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel, self.thread)
    }
}

/// Platform message id (Slack `ts`) of a single inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A documentation reference pulled out of assistant markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
}

/// Output of one sanitizer run. Both fields are always present; "nothing"
/// is an empty string and an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedText {
    pub text: String,
    pub links: Vec<RelatedLink>,
}

impl SanitizedText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
