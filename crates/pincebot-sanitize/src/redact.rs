//! Stage 4: redaction passes.
//!
//! Every pass expects whitelisted URLs/emails to already be placeholders
//! (see [`crate::protect`]). Passes run in the order of [`redact`]; the
//! account-id pass runs before the keyword pass, so `account: 123456789012`
//! ends up as `account: [AWS_ACCOUNT_REDACTED]`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::protect::PLACEHOLDER_PREFIX;

pub const ARN_MARKER: &str = "[AWS_ARN_REDACTED]";
pub const ACCOUNT_MARKER: &str = "[AWS_ACCOUNT_REDACTED]";
pub const S3_PATH_MARKER: &str = "s3://[S3_INTERNAL_PATH_REDACTED]";
pub const VALUE_MARKER: &str = "[REDACTED]";
pub const IDENTIFIER_MARKER: &str = "[IDENTIFIER_REDACTED]";

/// Dotted tokens containing any of these (case-insensitive) pass through untouched.
pub const SAFE_SUBSTRINGS: &[&str] = &[
    "pypi.org",
    "firebolt.io",
    "github.com",
    "support@firebolt.io",
    "information_schema",
];

fn arn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"arn:aws:[a-z0-9:-]+").expect("arn regex must compile"))
}

fn account_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{12}\b").expect("account id regex must compile"))
}

fn s3_internal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"s3://[a-z0-9-]{36}--table-s3").expect("s3 path regex must compile")
    })
}

fn keyword_value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(engine|account|table|database):\s*[\w-]+")
            .expect("keyword regex must compile")
    })
}

fn dotted_identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[a-zA-Z_]\w*(?:\.[a-zA-Z_]\w*)+\b").expect("identifier regex must compile")
    })
}

/// Run every pass in order.
pub fn redact(text: &str) -> String {
    let text = redact_arns(text);
    let text = redact_account_ids(&text);
    let text = redact_s3_internal_paths(&text);
    let text = redact_keyword_values(&text);
    redact_dotted_identifiers(&text)
}

/// a. `arn:aws:iam::123456789012:role/x` → `[AWS_ARN_REDACTED]/x`
pub fn redact_arns(text: &str) -> String {
    arn_re().replace_all(text, ARN_MARKER).into_owned()
}

/// b. Standalone 12-digit numbers.
pub fn redact_account_ids(text: &str) -> String {
    account_id_re().replace_all(text, ACCOUNT_MARKER).into_owned()
}

/// c. Internal table bucket paths keyed by a 36-character UUID.
pub fn redact_s3_internal_paths(text: &str) -> String {
    s3_internal_re().replace_all(text, S3_PATH_MARKER).into_owned()
}

/// d. `engine|account|table|database: value`, keyword kept as written.
pub fn redact_keyword_values(text: &str) -> String {
    keyword_value_re()
        .replace_all(text, format!("${{1}}: {VALUE_MARKER}").as_str())
        .into_owned()
}

/// e. `schema.table` style tokens, except versions, safe names and placeholders.
///
/// A whole dotted chain is one token, so `docs.firebolt.io` is judged as a
/// unit and `db.schema.table` collapses to a single marker.
pub fn redact_dotted_identifiers(text: &str) -> String {
    dotted_identifier_re()
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            if is_passthrough(token) {
                token.to_string()
            } else {
                IDENTIFIER_MARKER.to_string()
            }
        })
        .into_owned()
}

fn is_passthrough(token: &str) -> bool {
    if is_version_like(token) || token.contains(PLACEHOLDER_PREFIX) {
        return true;
    }
    let lower = token.to_lowercase();
    SAFE_SUBSTRINGS.iter().any(|safe| lower.contains(safe))
}

fn is_version_like(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arn_is_replaced() {
        let out = redact_arns("role arn:aws:iam::123456789012:role/Admin here");
        assert_eq!(out, "role [AWS_ARN_REDACTED]/Admin here");
    }

    #[test]
    fn twelve_digit_numbers_only() {
        assert_eq!(
            redact_account_ids("id 123456789012 end"),
            "id [AWS_ACCOUNT_REDACTED] end"
        );
        // 11 and 13 digits are left alone
        assert_eq!(redact_account_ids("12345678901"), "12345678901");
        assert_eq!(redact_account_ids("1234567890123"), "1234567890123");
    }

    #[test]
    fn s3_internal_path() {
        let uuid = "0123abcd-0123-4567-89ab-0123456789ab";
        assert_eq!(uuid.len(), 36);
        let out = redact_s3_internal_paths(&format!("at s3://{uuid}--table-s3/data"));
        assert_eq!(out, "at s3://[S3_INTERNAL_PATH_REDACTED]/data");
    }

    #[test]
    fn keyword_values_keep_keyword_case() {
        let out = redact_keyword_values("Engine: my-engine and DATABASE:prod_db");
        assert_eq!(out, "Engine: [REDACTED] and DATABASE: [REDACTED]");
    }

    #[test]
    fn keyword_pass_does_not_touch_other_words() {
        assert_eq!(redact_keyword_values("user: bob"), "user: bob");
    }

    #[test]
    fn dotted_identifiers_are_redacted() {
        assert_eq!(
            redact_dotted_identifiers("select from sales.orders now"),
            "select from [IDENTIFIER_REDACTED] now"
        );
    }

    #[test]
    fn dotted_chains_are_one_token() {
        assert_eq!(
            redact_dotted_identifiers("sum(sales.orders.amount)"),
            "sum([IDENTIFIER_REDACTED])"
        );
        assert_eq!(
            redact_dotted_identifiers("host docs.firebolt.io"),
            "host docs.firebolt.io"
        );
    }

    #[test]
    fn versions_and_safe_names_pass_through() {
        let input = "v 2.7.2 with information_schema.tables on github.com";
        assert_eq!(redact_dotted_identifiers(input), input);
    }

    #[test]
    fn placeholders_are_never_consumed() {
        let input = "__WHITELIST_PLACEHOLDER_0__.suffix";
        assert_eq!(redact_dotted_identifiers(input), input);
    }

    #[test]
    fn version_like_helper() {
        assert!(is_version_like("1.2.3"));
        assert!(!is_version_like("v1.2"));
        assert!(!is_version_like(""));
    }

    #[test]
    fn account_pass_runs_before_keyword_pass() {
        assert_eq!(
            redact("account: 123456789012"),
            "account: [AWS_ACCOUNT_REDACTED]"
        );
    }
}
