//! Markdown code-fence handling for JSON-mode responses.
//!
//! Generation services often wrap structured output in a fenced block.
//! [`strip_json_fence`] removes exactly one leading "```json\n" and one
//! trailing "```", nothing else, and never validates the rest.
//! [`parse_json_document`] is the structural check run afterwards.

pub const JSON_FENCE_OPEN: &str = "```json\n";
pub const FENCE_CLOSE: &str = "```";

/// Remove a literal leading "```json\n" and a literal trailing "```", each at
/// most once.
pub fn strip_json_fence(raw: &str) -> &str {
    let stripped = raw.strip_prefix(JSON_FENCE_OPEN).unwrap_or(raw);
    stripped.strip_suffix(FENCE_CLOSE).unwrap_or(stripped)
}

/// Parse cleaned model output as JSON.
///
/// Tries the text as-is first, then a lenient candidate with surrounding
/// whitespace and any fence variant (```JSON, bare ```, trailing newline)
/// removed. Returns the first parse error when both fail.
pub fn parse_json_document(text: &str) -> Result<serde_json::Value, serde_json::Error> {
    let first = match serde_json::from_str(text) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let lenient = strip_any_fence(text);
    if lenient != text {
        if let Ok(value) = serde_json::from_str(lenient) {
            return Ok(value);
        }
    }
    Err(first)
}

fn strip_any_fence(text: &str) -> &str {
    let mut s = text.trim();
    if s.starts_with(FENCE_CLOSE) {
        // Drop the opening fence line including any language tag.
        s = match s.find('\n') {
            Some(idx) => &s[idx + 1..],
            None => &s[FENCE_CLOSE.len()..],
        };
    }
    let s = s.trim_end();
    s.strip_suffix(FENCE_CLOSE).unwrap_or(s).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_leading_and_trailing_fence_once() {
        assert_eq!(strip_json_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}\n");
    }

    #[test]
    fn unfenced_text_is_unchanged() {
        assert_eq!(strip_json_fence("plain text"), "plain text");
        assert_eq!(strip_json_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn strips_non_recursively() {
        assert_eq!(
            strip_json_fence("```json\n```json\n[]``````"),
            "```json\n[]```"
        );
    }

    #[test]
    fn only_anchored_fences_are_removed() {
        let raw = "note: ```json\n{}\n``` trailing";
        assert_eq!(strip_json_fence(raw), raw);
    }

    #[test]
    fn parses_clean_document() {
        assert_eq!(parse_json_document("{\"a\":1}\n").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn lenient_parse_handles_fence_variants() {
        let text = strip_json_fence("```JSON\n[1, 2]\n```\n");
        assert_eq!(parse_json_document(text).unwrap(), json!([1, 2]));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_json_document("Total: 12.50").is_err());
    }
}
