//! Stage 6: markdown → Slack mrkdwn.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#+\s+(.*)$").expect("heading regex must compile"))
}

fn trailing_filler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(for more details|for more information|for more|see more|see the|refer to|read more|check the|available at)\s*[\.\s]*$",
        )
        .expect("filler regex must compile")
    })
}

/// Convert assistant markdown to chat emphasis and drop a dangling "see more" tail.
pub fn to_chat_markdown(text: &str) -> String {
    let text = text.replace("**", "*");
    let text = heading_re().replace_all(&text, |caps: &Captures| emphasize(&caps[1]));
    let text = trailing_filler_re().replace(&text, "");
    text.trim().to_string()
}

fn emphasize(line: &str) -> String {
    let line = line.trim_end();
    // already bold after the `**` collapse
    if line.len() > 1 && line.starts_with('*') && line.ends_with('*') {
        line.to_string()
    } else {
        format!("*{line}*")
    }
}
