//! Slack request signing: `X-Slack-Signature: v0=<hex>` where the hex is an
//! HMAC-SHA256 over `v0:{X-Slack-Request-Timestamp}:{raw body}` keyed with
//! the app's signing secret.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use pincebot_slack::SlackError;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Requests older (or newer) than this are rejected as replays.
pub const MAX_SKEW_SECS: u64 = 5 * 60;

/// Verify a Slack request against `secret` at wall-clock time `now_secs`.
pub fn verify_slack_signature(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
    now_secs: i64,
) -> Result<(), SlackError> {
    let timestamp = header(headers, TIMESTAMP_HEADER)?;
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SlackError::Signature("timestamp is not a number".to_string()))?;
    if now_secs.abs_diff(ts) > MAX_SKEW_SECS {
        return Err(SlackError::Signature("stale timestamp".to_string()));
    }

    let sig_hex = header(headers, SIGNATURE_HEADER)?
        .strip_prefix("v0=")
        .ok_or_else(|| SlackError::Signature("unsupported signature version".to_string()))?;
    let expected = hex::decode(sig_hex)
        .map_err(|_| SlackError::Signature("signature is not valid hex".to_string()))?;

    mac_for(secret, timestamp, body)?
        .verify_slice(&expected)
        .map_err(|_| SlackError::Signature("signature mismatch".to_string()))
}

/// Compute the `v0=` signature Slack would send for this request.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String, SlackError> {
    let mac = mac_for(secret, timestamp, body)?;
    Ok(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256, SlackError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SlackError::Signature("invalid HMAC key length".to_string()))?;
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, SlackError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| SlackError::Signature(format!("missing {name} header")))
}
