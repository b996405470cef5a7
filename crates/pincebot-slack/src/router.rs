use pincebot_aggregator::{Aggregator, IngestOutcome};
use pincebot_core::{ConversationKey, EventId};
use tracing::debug;

use crate::ack::ProcessingMarker;
use crate::events::{MessageEvent, SlackEvent};
use crate::filter::BotFilter;

/// Message subtypes that still carry a question. `bot_message` is left to
/// [`BotFilter`] to decide.
const ACCEPTED_SUBTYPES: &[&str] = &["thread_broadcast", "file_share", "bot_message"];

/// What happened to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Ingested(IngestOutcome),
    /// Plain thread message with no pending aggregation to join.
    NotPending,
    Ignored(&'static str),
}

/// Feeds inbound Slack events into the aggregator.
///
/// An `app_mention` starts or extends its thread's aggregation. A plain
/// `message` only extends one that is already pending, so ordinary channel
/// chatter never reaches the assistant.
#[derive(Clone)]
pub struct EventRouter {
    aggregator: Aggregator,
    filter: BotFilter,
    marker: ProcessingMarker,
}

impl EventRouter {
    pub fn new(aggregator: Aggregator, filter: BotFilter, marker: ProcessingMarker) -> Self {
        Self {
            aggregator,
            filter,
            marker,
        }
    }

    pub async fn route(&self, event: SlackEvent) -> RouteOutcome {
        let outcome = match event {
            SlackEvent::AppMention(msg) => self.route_message(msg, true).await,
            SlackEvent::Message(msg) => self.route_message(msg, false).await,
            SlackEvent::Other => RouteOutcome::Ignored("unsupported event type"),
        };
        debug!(?outcome, "event routed");
        outcome
    }

    async fn route_message(&self, msg: MessageEvent, mention: bool) -> RouteOutcome {
        if self.filter.ignores(msg.bot_id.as_deref()) {
            return RouteOutcome::Ignored("bot filtered");
        }
        if let Some(subtype) = msg.subtype.as_deref() {
            if !ACCEPTED_SUBTYPES.contains(&subtype) {
                return RouteOutcome::Ignored("message subtype");
            }
        }
        if msg.channel.is_empty() || msg.ts.is_empty() {
            return RouteOutcome::Ignored("missing channel or ts");
        }
        // a plain top-level message can never belong to an aggregation
        if !mention && msg.thread_ts.is_none() {
            return RouteOutcome::NotPending;
        }

        let text = strip_leading_mention(&msg.text);
        if text.is_empty() {
            return RouteOutcome::Ignored("empty text");
        }

        let key = ConversationKey::new(msg.channel.as_str(), msg.thread_root());
        let event = EventId::from(msg.ts.as_str());
        let text = text.to_string();

        let outcome = if mention {
            self.aggregator.ingest(key, text, event)
        } else {
            match self.aggregator.append_if_pending(&key, text, event) {
                Some(outcome) => outcome,
                None => return RouteOutcome::NotPending,
            }
        };

        if outcome == IngestOutcome::Started {
            self.marker.mark(&msg.channel, &msg.ts).await;
        }
        RouteOutcome::Ingested(outcome)
    }
}

/// Drop a leading `<@U…>` (or `<@U…|name>`) mention and surrounding whitespace.
pub fn strip_leading_mention(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("<@") {
        if let Some(end) = rest.find('>') {
            return rest[end + 1..].trim();
        }
    }
    trimmed
}
