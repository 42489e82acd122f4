//! Secret and PII scrubbing for error events.
//!
//! Free text is scrubbed with three patterns, applied in order: bearer
//! credentials, bare JWTs, then e-mail addresses. Context objects are walked
//! recursively with hard caps on depth, array length, key count and string
//! length, and values under sensitive keys are replaced wholesale.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub const REDACTED_BEARER: &str = "Bearer [REDACTED]";
pub const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";
pub const REDACTED_EMAIL: &str = "[REDACTED_EMAIL]";
pub const REDACTED: &str = "[REDACTED]";
pub const TRUNCATED: &str = "[TRUNCATED]";

pub const MAX_CONTEXT_DEPTH: usize = 4;
pub const MAX_ARRAY_ITEMS: usize = 20;
pub const MAX_OBJECT_KEYS: usize = 30;
pub const MAX_STRING_CHARS: usize = 1000;

static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*").unwrap());

static JWT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\beyJ[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]{4,}\.[A-Za-z0-9_-]*").unwrap()
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Key fragments whose values are never kept
const SENSITIVE_KEYS: &[&str] = &["token", "password", "secret", "cookie", "authorization"];

/// Scrub credentials and e-mail addresses out of free text.
pub fn redact_text(input: &str) -> String {
    let scrubbed = BEARER_RE.replace_all(input, REDACTED_BEARER);
    let scrubbed = JWT_RE.replace_all(&scrubbed, REDACTED_TOKEN);
    EMAIL_RE.replace_all(&scrubbed, REDACTED_EMAIL).into_owned()
}

/// Truncate to at most `max` characters on a char boundary.
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|fragment| lowered.contains(fragment))
}

/// Sanitize an arbitrary JSON context value.
pub fn redact_context(value: &Value) -> Value {
    redact_value(value, 0)
}

fn redact_value(value: &Value, depth: usize) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_chars(&redact_text(s), MAX_STRING_CHARS)),
        Value::Array(items) => {
            if depth >= MAX_CONTEXT_DEPTH {
                return Value::String(TRUNCATED.to_string());
            }
            Value::Array(
                items
                    .iter()
                    .take(MAX_ARRAY_ITEMS)
                    .map(|item| redact_value(item, depth + 1))
                    .collect(),
            )
        }
        Value::Object(map) => {
            if depth >= MAX_CONTEXT_DEPTH {
                return Value::String(TRUNCATED.to_string());
            }
            let mut out = Map::new();
            for (key, item) in map.iter().take(MAX_OBJECT_KEYS) {
                let sanitized = if is_sensitive_key(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    redact_value(item, depth + 1)
                };
                out.insert(key.clone(), sanitized);
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}
