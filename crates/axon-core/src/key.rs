//! Join-key normalization
//!
//! Every join in the pipeline compares keys only after normalization, so a
//! raw-cased or padded identifier never causes a false negative. A missing
//! value normalizes to the empty string, which never matches a real key.

use serde_json::Value;

/// Canonicalize a raw string identifier: trim + lowercase.
pub fn normalize_str(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonicalize any scalar join key. Null and non-scalar values yield `""`.
pub fn normalize(value: &Value) -> String {
    match value {
        Value::String(s) => normalize_str(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Normalize the named field of a record, `""` when the field is absent.
pub fn normalize_field(record: &serde_json::Map<String, Value>, field: &str) -> String {
    record.get(field).map(normalize).unwrap_or_default()
}
