use std::sync::Arc;

use pincebot_aggregator::AggregatedReady;
use pincebot_assistant::AnswerPipeline;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::ack::ProcessingMarker;
use crate::platform::ChatPlatform;

/// Turns finished aggregations into posted answers.
#[derive(Clone)]
pub struct Delivery {
    pipeline: Arc<AnswerPipeline>,
    platform: Arc<dyn ChatPlatform>,
    marker: ProcessingMarker,
}

impl Delivery {
    pub fn new(
        pipeline: Arc<AnswerPipeline>,
        platform: Arc<dyn ChatPlatform>,
        marker: ProcessingMarker,
    ) -> Self {
        Self {
            pipeline,
            platform,
            marker,
        }
    }

    /// Consume the aggregator's ready channel until it closes.
    ///
    /// Each aggregation is handled on its own task so one slow assistant call
    /// never holds up another thread.
    pub async fn run(self, mut ready_rx: mpsc::Receiver<AggregatedReady>) {
        while let Some(ready) = ready_rx.recv().await {
            let this = self.clone();
            tokio::spawn(async move { this.deliver(ready).await });
        }
        info!("ready channel closed, delivery loop exiting");
    }

    /// Answer one aggregation: post the answer, or clear the processing
    /// reaction when there is nothing to post.
    pub async fn deliver(&self, ready: AggregatedReady) {
        let channel = ready.key.channel.as_str();
        let thread = ready.key.thread.as_str();

        match self.pipeline.process(&ready.text).await {
            Some(answer) => {
                info!(key = %ready.key, links = answer.links.len(), "posting answer");
                if let Err(e) = self.platform.post_answer(channel, thread, &answer).await {
                    warn!(key = %ready.key, code = e.code(), error = %e, "failed to post answer");
                }
            }
            None => {
                info!(key = %ready.key, "no answer, clearing processing reaction");
                self.marker.clear(channel, ready.trigger.as_str()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use pincebot_assistant::{AssistantBackend, AssistantError, StreamEvent};
    use pincebot_core::{ConversationKey, EventId};
    use pincebot_sanitize::Sanitizer;

    use crate::testing::{Call, RecordingPlatform};

    struct FixedBackend(Option<&'static str>);

    #[async_trait]
    impl AssistantBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn send_stream(
            &self,
            _query: &str,
            tx: mpsc::Sender<StreamEvent>,
        ) -> Result<(), AssistantError> {
            let Some(text) = self.0 else {
                return Err(AssistantError::Api {
                    status: 500,
                    message: "down".into(),
                });
            };
            let _ = tx.send(StreamEvent::TextDelta { text: text.into() }).await;
            let _ = tx.send(StreamEvent::Done).await;
            Ok(())
        }
    }

    fn delivery(answer: Option<&'static str>, platform: Arc<RecordingPlatform>) -> Delivery {
        let pipeline = AnswerPipeline::new(
            Sanitizer::default(),
            Arc::new(FixedBackend(answer)),
            Duration::from_secs(40),
        );
        let marker = ProcessingMarker::new(platform.clone(), "eyes");
        Delivery::new(Arc::new(pipeline), platform, marker)
    }

    fn ready(thread: &str, trigger: &str) -> AggregatedReady {
        AggregatedReady {
            key: ConversationKey::new("C1", thread),
            text: "how do I COPY?".into(),
            trigger: EventId::from(trigger),
            message_count: 1,
        }
    }

    #[tokio::test]
    async fn answer_is_posted_in_thread() {
        let platform = Arc::new(RecordingPlatform::default());
        delivery(Some("Use **COPY FROM**. See [COPY](/sql/copy)"), platform.clone())
            .deliver(ready("1.0", "1.0"))
            .await;

        let calls = platform.calls();
        assert_eq!(calls.len(), 1);
        let Call::PostAnswer {
            channel,
            thread_ts,
            answer,
        } = &calls[0]
        else {
            panic!("expected answer, got {calls:?}");
        };
        assert_eq!(channel, "C1");
        assert_eq!(thread_ts, "1.0");
        assert_eq!(answer.text, "Use *COPY FROM*. See");
        assert_eq!(answer.links[0].url, "https://docs.firebolt.io/sql/copy");
    }

    #[tokio::test]
    async fn no_answer_clears_reaction_on_trigger() {
        let platform = Arc::new(RecordingPlatform::default());
        delivery(None, platform.clone())
            .deliver(ready("1.0", "1.5"))
            .await;
        assert_eq!(
            platform.calls(),
            vec![Call::RemoveReaction {
                channel: "C1".into(),
                ts: "1.5".into(),
                name: "eyes".into()
            }]
        );
    }

    #[tokio::test]
    async fn post_failure_is_swallowed() {
        let platform = Arc::new(RecordingPlatform::failing());
        delivery(Some("fine answer"), platform.clone())
            .deliver(ready("1.0", "1.0"))
            .await;
        assert_eq!(platform.calls().len(), 1);
    }

    #[tokio::test]
    async fn run_drains_channel_and_exits_on_close() {
        let platform = Arc::new(RecordingPlatform::default());
        let (tx, rx) = mpsc::channel(4);
        let handle = tokio::spawn(delivery(Some("answer"), platform.clone()).run(rx));

        tx.send(ready("1.0", "1.0")).await.unwrap();
        tx.send(ready("2.0", "2.0")).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        // delivery tasks are detached; wait for both posts
        for _ in 0..100 {
            if platform.calls().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let mut threads: Vec<String> = platform
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PostAnswer { thread_ts, .. } => Some(thread_ts),
                _ => None,
            })
            .collect();
        threads.sort();
        assert_eq!(threads, vec!["1.0", "2.0"]);
    }
}
