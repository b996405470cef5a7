//! Per-thread debounce of chat messages into one question.
//!
//! Every thread (a [`ConversationKey`](pincebot_core::ConversationKey)) gets at
//! most one pending aggregation. Each new message restarts the quiet-period
//! countdown; when a countdown runs out the collected messages are joined and
//! sent as an [`AggregatedReady`] on the channel passed to [`Aggregator::new`].

pub mod aggregator;
pub mod types;

pub use aggregator::Aggregator;
pub use types::{AggregatedReady, IngestOutcome};
