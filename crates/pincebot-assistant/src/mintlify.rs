use std::time::Duration;

use async_trait::async_trait;
use pincebot_core::config::AssistantConfig;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::AssistantError;
use crate::provider::AssistantBackend;
use crate::stream::{pump_lines, StreamEvent};

/// Mintlify "discovery v2" documentation assistant.
pub struct MintlifyBackend {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    domain: String,
    fingerprint: String,
    retrieval_page_size: u32,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageRequest<'a> {
    fp: &'a str,
    messages: Vec<RequestMessage<'a>>,
    retrieval_page_size: u32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    id: String,
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    #[serde(rename = "type")]
    part_type: &'static str,
    text: &'a str,
}

impl MintlifyBackend {
    pub fn new(api_key: impl Into<String>, config: &AssistantConfig) -> Result<Self, AssistantError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            domain: config.domain.clone(),
            fingerprint: config.fingerprint.clone(),
            retrieval_page_size: config.retrieval_page_size,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/discovery/v2/assistant/{}/message",
            self.base_url, self.domain
        )
    }

    fn build_request_body<'a>(&'a self, query: &'a str, now_secs: i64) -> MessageRequest<'a> {
        MessageRequest {
            fp: &self.fingerprint,
            messages: vec![RequestMessage {
                id: now_secs.to_string(),
                role: "user",
                parts: vec![RequestPart {
                    part_type: "text",
                    text: query,
                }],
            }],
            retrieval_page_size: self.retrieval_page_size,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::Timeout {
                ms: self.timeout.as_millis() as u64,
            }
        } else {
            AssistantError::Http(e)
        }
    }
}

#[async_trait]
impl AssistantBackend for MintlifyBackend {
    fn name(&self) -> &str {
        "mintlify"
    }

    async fn send_stream(
        &self,
        query: &str,
        tx: mpsc::Sender<StreamEvent>,
    ) -> Result<(), AssistantError> {
        let body = self.build_request_body(query, chrono::Utc::now().timestamp());
        let url = self.endpoint();

        debug!(domain = %self.domain, query_len = query.len(), "sending question to Mintlify");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Mintlify API error");
            return Err(AssistantError::Api {
                status,
                message: text,
            });
        }

        pump_lines(resp.bytes_stream(), tx).await;
        Ok(())
    }
}
