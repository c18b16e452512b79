//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, phone numbers and inline image blobs from
//! strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(AIza[0-9A-Za-z\-_]{35})|(sk-[a-zA-Z0-9\-_]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap());
static KEY_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());
static BASE64_BLOB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9+/]{256,}={0,2}").unwrap());

/// Redacts credentials and image blobs, leaving other text as is.
///
/// Used for recognized-text previews, where long digit runs are usually
/// invoice or order numbers.
pub fn redact_secrets(input: &str) -> String {
    // Blobs first so key patterns never match inside image data.
    let redacted = BASE64_BLOB_RE.replace_all(input, |caps: &regex::Captures| {
        format!("[BASE64 {} chars]", caps[0].len())
    });
    let redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    KEY_PARAM_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .to_string()
}

/// Redacts sensitive patterns in a string, phone numbers included.
pub fn redact_sensitive_data(input: &str) -> String {
    TELEPHONE_RE
        .replace_all(&redact_secrets(input), "[REDACTED_PHONE]")
        .to_string()
}

/// First `max_chars` characters with secrets removed, with an ellipsis when cut.
pub fn preview(input: &str, max_chars: usize) -> String {
    let clean = redact_secrets(input);
    let mut chars = clean.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
