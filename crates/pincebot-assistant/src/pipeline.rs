use std::sync::Arc;
use std::time::Duration;

use pincebot_core::RelatedLink;
use pincebot_sanitize::Sanitizer;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::provider::AssistantBackend;
use crate::refusal::is_refusal;
use crate::stream::StreamEvent;

/// A sanitized, non-empty answer ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub links: Vec<RelatedLink>,
}

/// Question in, sanitized answer (or nothing) out.
pub struct AnswerPipeline {
    sanitizer: Sanitizer,
    backend: Arc<dyn AssistantBackend>,
    timeout: Duration,
    refusal_filter: bool,
}

impl AnswerPipeline {
    pub fn new(sanitizer: Sanitizer, backend: Arc<dyn AssistantBackend>, timeout: Duration) -> Self {
        Self {
            sanitizer,
            backend,
            timeout,
            refusal_filter: true,
        }
    }

    pub fn with_refusal_filter(mut self, enabled: bool) -> Self {
        self.refusal_filter = enabled;
        self
    }

    /// Answer `raw_question`. Every failure is logged and collapses to `None`.
    pub async fn process(&self, raw_question: &str) -> Option<Answer> {
        let query = self.sanitizer.clean(raw_question);
        if query.is_empty() {
            debug!("question empty after sanitizing, skipping assistant");
            return None;
        }

        let raw_answer = match self.ask(&query.text).await {
            Ok(text) => text,
            Err(e) => {
                warn!(backend = self.backend.name(), code = e.code(), error = %e, "assistant call failed");
                return None;
            }
        };

        if raw_answer.trim().is_empty() {
            info!(backend = self.backend.name(), "assistant returned an empty answer");
            return None;
        }
        if self.refusal_filter && is_refusal(&raw_answer) {
            info!(backend = self.backend.name(), len = raw_answer.len(), "assistant declined to answer");
            return None;
        }

        let cleaned = self.sanitizer.clean(&raw_answer);
        if cleaned.is_empty() {
            info!("answer empty after sanitizing");
            return None;
        }

        debug!(len = cleaned.text.len(), links = cleaned.links.len(), "answer ready");
        Some(Answer {
            text: cleaned.text,
            links: cleaned.links,
        })
    }

    /// Run the backend and the accumulator side by side under one deadline.
    async fn ask(&self, query: &str) -> Result<String, AssistantError> {
        let (tx, rx) = mpsc::channel(64);
        let work = async { tokio::join!(self.backend.send_stream(query, tx), accumulate(rx)) };

        let (sent, answer) = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| AssistantError::Timeout {
                ms: self.timeout.as_millis() as u64,
            })?;
        sent?;
        answer
    }
}

/// Concatenate text deltas in arrival order until `Done` or the sender is dropped.
pub async fn accumulate(mut rx: mpsc::Receiver<StreamEvent>) -> Result<String, AssistantError> {
    let mut answer = String::new();
    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::TextDelta { text } => answer.push_str(&text),
            StreamEvent::Done => break,
            StreamEvent::Error { message } => return Err(AssistantError::Stream(message)),
        }
    }
    Ok(answer)
}
