use async_trait::async_trait;
use pincebot_assistant::Answer;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::blocks::{render_answer, ANSWER_FALLBACK_TEXT};
use crate::error::SlackError;
use crate::platform::ChatPlatform;

/// Minimal Slack Web API client over reqwest.
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

/// Every Web API response carries `ok`; failures add an `error` code.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST a JSON body to a Web API method.
    async fn call(&self, method: &str, body: Value) -> Result<(), SlackError> {
        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "calling Slack Web API");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(method, status = status.as_u16(), body = %text, "Slack HTTP error");
            return Err(SlackError::Api {
                method: method.to_string(),
                error: format!("http_{}", status.as_u16()),
            });
        }

        let api: ApiResponse = resp.json().await?;
        check_ok(method, api)
    }
}

fn check_ok(method: &str, resp: ApiResponse) -> Result<(), SlackError> {
    if resp.ok {
        return Ok(());
    }
    let error = resp.error.unwrap_or_else(|| "unknown_error".to_string());
    // the reaction is already in the requested state
    if matches!(error.as_str(), "already_reacted" | "no_reaction") {
        debug!(method, error = %error, "reaction already in place");
        return Ok(());
    }
    Err(SlackError::Api {
        method: method.to_string(),
        error,
    })
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError> {
        self.call(
            "reactions.add",
            json!({ "channel": channel, "timestamp": ts, "name": name }),
        )
        .await
    }

    async fn remove_reaction(
        &self,
        channel: &str,
        ts: &str,
        name: &str,
    ) -> Result<(), SlackError> {
        self.call(
            "reactions.remove",
            json!({ "channel": channel, "timestamp": ts, "name": name }),
        )
        .await
    }

    async fn post_answer(
        &self,
        channel: &str,
        thread_ts: &str,
        answer: &Answer,
    ) -> Result<(), SlackError> {
        self.call(
            "chat.postMessage",
            json!({
                "channel": channel,
                "thread_ts": thread_ts,
                "text": ANSWER_FALLBACK_TEXT,
                "blocks": render_answer(answer),
            }),
        )
        .await
    }

    async fn post_reply(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        self.call(
            "chat.postMessage",
            json!({ "channel": channel, "thread_ts": thread_ts, "text": text }),
        )
        .await
    }
}
