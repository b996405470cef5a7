//! Stage 1 and 2: related-link extraction and artifact stripping.
//!
//! Assistant markdown references documentation pages with site-relative
//! paths in any bracket/paren combination: `[title](/path)`, `(title)[/path]`,
//! `[title][/path]`, `(title)(/path)`. Those are lifted out into
//! [`RelatedLink`]s and removed from the body so they only appear once, in the
//! rendered "Related Documentation" list.

use std::sync::OnceLock;

use pincebot_core::RelatedLink;
use regex::Regex;

/// Upper bound on links returned by one sanitizer run.
pub const MAX_RELATED_LINKS: usize = 3;

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\[\(](.*?)[\]\)]\s*[\(\[](/\w+.*?)[\]\)]").expect("link regex must compile")
    })
}

fn suggestions_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```suggestions.*?```").expect("suggestions regex must compile"))
}

/// Collect up to [`MAX_RELATED_LINKS`] links, first occurrence of each URL wins.
///
/// Matches with an empty title or path are ignored.
pub fn extract_links(text: &str, docs_base_url: &str) -> Vec<RelatedLink> {
    let base = docs_base_url.trim_end_matches('/');
    let mut links: Vec<RelatedLink> = Vec::new();

    for caps in link_re().captures_iter(text) {
        let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let path = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
        if title.is_empty() || path.is_empty() {
            continue;
        }

        let url = format!("{base}{path}");
        if links.iter().any(|l| l.url == url) {
            continue;
        }
        links.push(RelatedLink {
            title: title.to_string(),
            url,
        });
        if links.len() == MAX_RELATED_LINKS {
            break;
        }
    }

    links
}

/// Remove ```` ```suggestions ```` fenced blocks, including multi-line ones.
pub fn strip_suggestions(text: &str) -> String {
    suggestions_re().replace_all(text, "").into_owned()
}

/// Remove every link construct that [`extract_links`] recognises.
pub fn strip_link_constructs(text: &str) -> String {
    link_re().replace_all(text, "").into_owned()
}
