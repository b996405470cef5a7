use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pincebot_core::{ConversationKey, EventId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::types::{AggregatedReady, IngestOutcome};

/// One thread's collected messages and its live countdown.
struct Pending {
    messages: Vec<String>,
    seen: Vec<EventId>,
    trigger: EventId,
    /// Bumped on every reschedule; a countdown only fires if it still matches.
    generation: u64,
    countdown: JoinHandle<()>,
}

struct Shared {
    pending: DashMap<ConversationKey, Pending>,
    quiet_period: Duration,
    ready_tx: mpsc::Sender<AggregatedReady>,
    next_generation: AtomicU64,
}

/// Debounces chat messages per thread.
///
/// All mutation of a thread's entry happens under its DashMap shard lock, and
/// the lock is never held across an `.await`. A countdown that loses the race
/// against a concurrent ingest sees a newer generation and does nothing, so a
/// burst is emitted exactly once.
///
/// Cloning is cheap; clones share the same pending set.
#[derive(Clone)]
pub struct Aggregator {
    shared: Arc<Shared>,
}

impl Aggregator {
    /// Create an aggregator that emits finished bursts on `ready_tx`.
    ///
    /// Countdowns are tokio tasks, so this must be used inside a runtime.
    pub fn new(quiet_period: Duration, ready_tx: mpsc::Sender<AggregatedReady>) -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: DashMap::new(),
                quiet_period,
                ready_tx,
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.shared.quiet_period
    }

    /// Add a message to the thread's aggregation, creating it if needed.
    ///
    /// Any running countdown for the thread is replaced by a fresh one.
    pub fn ingest(&self, key: ConversationKey, text: String, event: EventId) -> IngestOutcome {
        match self.shared.pending.entry(key) {
            Entry::Occupied(mut entry) => {
                let key = entry.key().clone();
                self.append(&key, entry.get_mut(), text, event)
            }
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                let generation = self.next_generation();
                let countdown = self.spawn_countdown(key.clone(), generation);
                entry.insert(Pending {
                    messages: vec![text],
                    seen: vec![event.clone()],
                    trigger: event,
                    generation,
                    countdown,
                });
                debug!(key = %key, "aggregation started");
                IngestOutcome::Started
            }
        }
    }

    /// Like [`ingest`](Self::ingest), but only for a thread that is already
    /// pending. Returns `None` (and creates nothing) otherwise.
    pub fn append_if_pending(
        &self,
        key: &ConversationKey,
        text: String,
        event: EventId,
    ) -> Option<IngestOutcome> {
        let mut pending = self.shared.pending.get_mut(key)?;
        Some(self.append(key, pending.value_mut(), text, event))
    }

    pub fn is_pending(&self, key: &ConversationKey) -> bool {
        self.shared.pending.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.shared.pending.len()
    }

    /// Abort every countdown and discard all pending aggregations.
    ///
    /// Returns how many aggregations were dropped without being emitted.
    pub fn shutdown(&self) -> usize {
        let mut dropped = 0;
        self.shared.pending.retain(|key, pending| {
            pending.countdown.abort();
            debug!(key = %key, messages = pending.messages.len(), "discarding pending aggregation");
            dropped += 1;
            false
        });
        info!(dropped, "aggregator shut down");
        dropped
    }

    // Caller holds the entry's shard lock.
    fn append(
        &self,
        key: &ConversationKey,
        pending: &mut Pending,
        text: String,
        event: EventId,
    ) -> IngestOutcome {
        if pending.seen.contains(&event) {
            debug!(key = %key, event = %event, "duplicate event ignored");
            return IngestOutcome::Duplicate;
        }

        pending.messages.push(text);
        pending.seen.push(event);

        pending.countdown.abort();
        pending.generation = self.next_generation();
        pending.countdown = self.spawn_countdown(key.clone(), pending.generation);

        let messages = pending.messages.len();
        debug!(key = %key, messages, "aggregation extended");
        IngestOutcome::Appended { messages }
    }

    fn next_generation(&self) -> u64 {
        self.shared.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    fn spawn_countdown(&self, key: ConversationKey, generation: u64) -> JoinHandle<()> {
        // Deadline fixed now, not when the task is first polled.
        let deadline = Instant::now() + self.shared.quiet_period;
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire(key, generation).await;
            }
        })
    }
}

impl Shared {
    async fn fire(&self, key: ConversationKey, generation: u64) {
        let Some((key, pending)) = self
            .pending
            .remove_if(&key, |_, p| p.generation == generation)
        else {
            debug!(key = %key, generation, "countdown superseded");
            return;
        };

        let ready = AggregatedReady {
            text: pending.messages.join(" "),
            message_count: pending.messages.len(),
            trigger: pending.trigger,
            key,
        };
        info!(key = %ready.key, messages = ready.message_count, "aggregation ready");

        if let Err(e) = self.ready_tx.send(ready).await {
            warn!(key = %e.0.key, "ready channel closed, aggregation dropped");
        }
    }
}
