use pincebot_core::{ConversationKey, EventId};

/// A finished aggregation, emitted once per burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedReady {
    pub key: ConversationKey,
    /// Messages joined with single spaces, in arrival order.
    pub text: String,
    /// First message of the burst; carries the processing reaction.
    pub trigger: EventId,
    pub message_count: usize,
}

/// What an ingest call did to the thread's aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// New aggregation created; the caller should mark the message as in progress.
    Started,
    /// Appended to a pending aggregation, countdown restarted.
    Appended { messages: usize },
    /// This event id is already part of the pending aggregation; nothing changed.
    Duplicate,
}
