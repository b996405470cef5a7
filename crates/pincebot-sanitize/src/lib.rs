//! Text sanitizer for assistant questions and answers.
//!
//! [`Sanitizer::clean`] runs a fixed, ordered pipeline:
//!
//! 1. [`links::extract_links`]: collect site-relative doc links (≤ 3, unique URL)
//! 2. [`links::strip_suggestions`] + [`links::strip_link_constructs`]: drop
//!    suggestion blocks and the inline link syntax
//! 3. [`protect::protect`]: URLs/emails → numbered placeholders
//! 4. [`redact::redact`]: ARN, account id, S3 internal path, keyword value,
//!    dotted identifier passes
//! 5. [`protect::restore`]: placeholders → original URLs/emails
//! 6. [`format::to_chat_markdown`]: bold/heading conversion, trailing filler removal
//!
//! Redaction is best-effort; the patterns are heuristics, not a guarantee.

pub mod format;
pub mod links;
pub mod protect;
pub mod redact;

use pincebot_core::config::DOCS_BASE_URL;
use pincebot_core::SanitizedText;
use tracing::debug;

/// Stateless sanitizer; the only setting is the docs host used for related links.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    docs_base_url: String,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DOCS_BASE_URL)
    }
}

impl Sanitizer {
    pub fn new(docs_base_url: impl Into<String>) -> Self {
        Self {
            docs_base_url: docs_base_url.into(),
        }
    }

    pub fn docs_base_url(&self) -> &str {
        &self.docs_base_url
    }

    pub fn clean(&self, text: &str) -> SanitizedText {
        if text.is_empty() {
            return SanitizedText::default();
        }

        let links = links::extract_links(text, &self.docs_base_url);

        let body = links::strip_suggestions(text);
        let body = links::strip_link_constructs(&body);

        let protected = protect::protect(&body);
        let redacted = redact::redact(&protected.text);
        let restored = protect::restore(&redacted, &protected.originals);

        let text = format::to_chat_markdown(&restored);

        debug!(
            in_len = body.len(),
            out_len = text.len(),
            links = links.len(),
            protected = protected.originals.len(),
            "sanitized text"
        );

        SanitizedText { text, links }
    }
}

/// [`Sanitizer::clean`] with the default docs host.
pub fn clean(text: &str) -> SanitizedText {
    Sanitizer::default().clean(text)
}
