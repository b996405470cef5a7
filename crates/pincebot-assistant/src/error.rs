#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout after {ms}ms")]
    Timeout { ms: u64 },

    #[error("Stream interrupted: {0}")]
    Stream(String),
}

impl AssistantError {
    /// Short code used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            AssistantError::Http(_) => "HTTP_ERROR",
            AssistantError::Api { .. } => "API_ERROR",
            AssistantError::Timeout { .. } => "TIMEOUT",
            AssistantError::Stream(_) => "STREAM_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        let api = AssistantError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(api.code(), "API_ERROR");
        assert_eq!(api.to_string(), "API error (503): overloaded");
        assert_eq!(AssistantError::Timeout { ms: 40_000 }.code(), "TIMEOUT");
        assert_eq!(AssistantError::Stream("reset".into()).code(), "STREAM_ERROR");
    }
}
