//! Tagged outcome of reading structured data out of model text.
//!
//! Planner, Coder and Reviewer all receive free-form text from a completion
//! provider and need a typed record back. Each has a single parsing function
//! returning [`ParseOutcome`]; the `Malformed` arm carries enough context for
//! the caller to log a diagnostic and build its degraded payload.

use serde::de::DeserializeOwned;

/// Result of parsing a model response into `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// The response matched the expected shape
    Parsed(T),
    /// The response could not be read; the raw text and reason are kept
    Malformed { raw: String, error: String },
}

impl<T> ParseOutcome<T> {
    pub fn malformed(raw: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Malformed {
            raw: raw.into(),
            error: error.into(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    /// Apply `f` to the parsed value, keeping `Malformed` untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            ParseOutcome::Parsed(value) => ParseOutcome::Parsed(f(value)),
            ParseOutcome::Malformed { raw, error } => ParseOutcome::Malformed { raw, error },
        }
    }

    /// Collapse the outcome, building a replacement value from the failure.
    pub fn unwrap_or_else(self, fallback: impl FnOnce(&str, &str) -> T) -> T {
        match self {
            ParseOutcome::Parsed(value) => value,
            ParseOutcome::Malformed { raw, error } => fallback(&raw, &error),
        }
    }
}

/// Locate the JSON document inside a model response.
///
/// Accepts either a bare JSON document or the first fenced code block
/// (` ```json `, ` ```plan ` or plain ` ``` `). Falls back to the trimmed text.
pub fn extract_json_block(response: &str) -> &str {
    let trimmed = response.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    if let Some(open) = trimmed.find("```") {
        let after_fence = &trimmed[open + 3..];
        // Skip the info string (e.g. "json") up to the end of the line
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(close) = body.find("```") {
            return body[..close].trim();
        }
    }

    trimmed
}

/// Deserialize a model response into `T`, tolerating fenced code blocks.
pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> ParseOutcome<T> {
    let candidate = extract_json_block(response);
    match serde_json::from_str::<T>(candidate) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(e) => ParseOutcome::malformed(response, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_bare_json() {
        let outcome: ParseOutcome<Sample> = parse_json_response(r#"  {"name": "a"} "#);
        assert_eq!(
            outcome,
            ParseOutcome::Parsed(Sample {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn test_fenced_json() {
        let response = "Here you go:\n```json\n{\"name\": \"b\"}\n```\nThanks";
        let outcome: ParseOutcome<Sample> = parse_json_response(response);
        assert!(outcome.is_parsed());
    }

    #[test]
    fn test_plain_text_is_malformed() {
        let outcome: ParseOutcome<Sample> = parse_json_response("I cannot do that.");
        match outcome {
            ParseOutcome::Malformed { raw, error } => {
                assert_eq!(raw, "I cannot do that.");
                assert!(!error.is_empty());
            }
            ParseOutcome::Parsed(_) => panic!("plain text should not parse"),
        }
    }

    #[test]
    fn test_unwrap_or_else_uses_fallback() {
        let outcome: ParseOutcome<Sample> = ParseOutcome::malformed("x", "bad");
        let value = outcome.unwrap_or_else(|raw, _| Sample {
            name: format!("fallback:{raw}"),
        });
        assert_eq!(value.name, "fallback:x");
    }
}
