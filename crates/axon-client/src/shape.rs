//! Declared response-shape handling
//!
//! Upstream endpoints return either a bare JSON array or an object wrapping
//! the row list under a known envelope key. Only the declared keys are
//! consulted; a response matching neither shape is logged and treated as an
//! empty dataset rather than guessed at.

use axon_core::{tabulate, Table};
use serde_json::Value;

use crate::resource::Resource;

/// Envelope keys an object response may wrap its row list in.
const ENVELOPE_KEYS: [&str; 2] = ["content", "data"];

/// Extract the row table from a raw response body for the given resource.
pub fn extract_rows(resource: Resource, body: Value) -> Table {
    let rows = match body {
        Value::Array(_) => body,
        Value::Object(ref map) => {
            match ENVELOPE_KEYS
                .iter()
                .find_map(|key| map.get(*key).filter(|v| v.is_array()).cloned())
            {
                Some(list) => list,
                None => {
                    tracing::warn!(
                        resource = %resource,
                        keys = ?map.keys().collect::<Vec<_>>(),
                        "Response object has no declared envelope key, treating as empty"
                    );
                    return Table::new();
                }
            }
        }
        other => {
            tracing::warn!(
                resource = %resource,
                "Unexpected response shape ({}), treating as empty",
                shape_of(&other)
            );
            return Table::new();
        }
    };

    match tabulate(resource.name(), rows) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(resource = %resource, error = %e, "Failed to tabulate response");
            Table::new()
        }
    }
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let table = extract_rows(Resource::Boards, json!([{"uuid": "a"}]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_content_envelope() {
        let table = extract_rows(
            Resource::Renewals,
            json!({"total": 1, "content": [{"uuid": "r1"}]}),
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table[0]["uuid"], json!("r1"));
    }

    #[test]
    fn test_data_envelope() {
        let table = extract_rows(Resource::Pools, json!({"data": [{"pool_id": "p"}]}));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_undeclared_envelope_is_empty() {
        // A list under an undeclared key is NOT discovered heuristically
        let table = extract_rows(Resource::Pools, json!({"rows": [{"pool_id": "p"}]}));
        assert!(table.is_empty());
    }

    #[test]
    fn test_scalar_response_is_empty() {
        assert!(extract_rows(Resource::Boards, json!("maintenance")).is_empty());
        assert!(extract_rows(Resource::Boards, Value::Null).is_empty());
    }
}
