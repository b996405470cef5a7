//! Stage 3 and 5: whitelist protection and restoration.
//!
//! URLs and email addresses are swapped for numbered placeholders before the
//! redaction passes run, then put back afterwards. Placeholders are assigned
//! in a single left-to-right pass, so a URL that is a prefix of a longer URL
//! never clobbers it.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Prefix shared by every placeholder; redaction passes skip tokens containing it.
pub const PLACEHOLDER_PREFIX: &str = "__WHITELIST_PLACEHOLDER_";

fn whitelist_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://\S+|[\w\.-]+@[\w\.-]+\.\w+").expect("whitelist regex must compile")
    })
}

/// Text with URLs/emails replaced, plus the originals in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    pub originals: Vec<String>,
}

pub fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_PREFIX}{index}__")
}

pub fn protect(text: &str) -> Protected {
    let mut originals = Vec::new();
    let text = whitelist_re()
        .replace_all(text, |caps: &Captures| {
            let token = placeholder(originals.len());
            originals.push(caps[0].to_string());
            token
        })
        .into_owned();
    Protected { text, originals }
}

/// Put the original URLs/emails back into `text`.
pub fn restore(text: &str, originals: &[String]) -> String {
    let mut out = text.to_string();
    for (i, original) in originals.iter().enumerate() {
        out = out.replace(&placeholder(i), original);
    }
    out
}
