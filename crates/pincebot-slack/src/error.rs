/// Errors produced by the Slack adapter.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack API error in {method}: {error}")]
    Api { method: String, error: String },

    #[error("signature rejected: {0}")]
    Signature(String),

    #[error("bad payload: {0}")]
    Payload(String),
}

impl SlackError {
    pub fn code(&self) -> &'static str {
        match self {
            SlackError::Http(_) => "HTTP_ERROR",
            SlackError::Api { .. } => "SLACK_API_ERROR",
            SlackError::Signature(_) => "BAD_SIGNATURE",
            SlackError::Payload(_) => "BAD_PAYLOAD",
        }
    }
}
