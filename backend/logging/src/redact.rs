//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and inline base64 image payloads from
//! strings prior to logging.

use once_cell::sync::Lazy;
use regex::Regex;

static GOOGLE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z\-_]{35}").unwrap());
static KEY_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());
static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static DATA_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(data:[a-z]+/[a-z0-9.+\-]+;base64,)([A-Za-z0-9+/=]+)").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = DATA_URL_RE.replace_all(input, |caps: &regex::Captures| {
        format!("{}[{} chars]", &caps[1], caps[2].len())
    });
    let redacted = KEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_KEY]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    let redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    redacted.into_owned()
}
