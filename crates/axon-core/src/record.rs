//! Record tables and the final-output sanitizer
//!
//! A record is a string-keyed map of loosely typed values exactly as the
//! upstream returns them; a table is an ordered list of records. Order is
//! significant: every join preserves the driving table's insertion order.

use serde_json::Value;

use crate::error::PipelineError;

/// One upstream row: string keys, scalar or shallow-nested JSON values.
pub type Record = serde_json::Map<String, Value>;

/// An ordered list of records.
pub type Table = Vec<Record>;

/// Convert a raw upstream payload into a table.
///
/// Accepts a JSON array of objects (non-object elements are dropped with a
/// warning). Anything else is a catastrophic shape error, reported once at
/// the pipeline boundary rather than per row.
pub fn tabulate(resource: &str, payload: Value) -> Result<Table, PipelineError> {
    match payload {
        Value::Array(rows) => {
            let total = rows.len();
            let table: Table = rows
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            if table.len() < total {
                tracing::warn!(
                    resource = %resource,
                    dropped = total - table.len(),
                    "Dropped non-record rows while tabulating"
                );
            }
            Ok(table)
        }
        other => Err(PipelineError::Untabulatable {
            resource: resource.to_string(),
            shape: shape_name(&other).to_string(),
        }),
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read a non-empty string-like field. Whitespace-only strings and nulls
/// count as missing, so the fallback chain skips over them.
pub fn non_empty_str(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a loosely typed cell to i64, 0 when missing or malformed.
pub fn as_i64_lenient(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let t = s.trim();
            t.parse::<i64>()
                .or_else(|_| t.parse::<f64>().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Normalize a finished table for serialization.
///
/// Every record ends up carrying the full column set (first-seen column
/// order), with missing cells filled by explicit JSON null. The output never
/// contains an undefined or not-a-number placeholder, so the presentation
/// layer can serialize it without special cases.
pub fn sanitize(mut table: Table) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for record in &table {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    for record in &mut table {
        for column in &columns {
            record.entry(column.clone()).or_insert(Value::Null);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_tabulate_accepts_list_of_records() {
        let table = tabulate("boards", json!([{"uuid": "a"}, {"uuid": "b"}])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0]["uuid"], json!("a"));
    }

    #[test]
    fn test_tabulate_drops_non_record_rows() {
        let table = tabulate("boards", json!([{"uuid": "a"}, 17, "x"])).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_tabulate_rejects_non_list_payload() {
        let err = tabulate("pools", json!("oops")).unwrap_err();
        assert!(err.to_string().contains("pools"));
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn test_sanitize_fills_missing_columns_with_null() {
        let table = vec![
            rec(json!({"a": 1, "b": 2})),
            rec(json!({"a": 3})),
            rec(json!({"c": "x"})),
        ];
        let clean = sanitize(table);
        assert_eq!(clean[1]["b"], Value::Null);
        assert_eq!(clean[1]["c"], Value::Null);
        assert_eq!(clean[0]["c"], Value::Null);
        assert_eq!(clean[2]["a"], Value::Null);
        // Present values untouched
        assert_eq!(clean[0]["a"], json!(1));
    }

    #[test]
    fn test_non_empty_str_skips_blank() {
        let r = rec(json!({"name": "  ", "ssid": "net-7"}));
        assert_eq!(non_empty_str(&r, "name"), None);
        assert_eq!(non_empty_str(&r, "ssid"), Some("net-7".into()));
        assert_eq!(non_empty_str(&r, "missing"), None);
    }

    #[test]
    fn test_lenient_coercions() {
        assert_eq!(as_i64_lenient(Some(&json!(7.9))), 7);
        assert_eq!(as_i64_lenient(Some(&json!("1024"))), 1024);
        assert_eq!(as_i64_lenient(Some(&json!(null))), 0);
        assert_eq!(as_i64_lenient(None), 0);
    }
}
