//! SIM pool aggregation
//!
//! Each pool row carries SIM counts and data quotas as nested (possibly
//! string-encoded) structures. This module extracts them into flat integer
//! columns and computes the pool's usage percentage, defined as exactly 0.0
//! when the quota is zero.

use serde_json::{Number, Value};

use crate::record::{as_i64_lenient, Record, Table};
use crate::usage::lenient_json;

fn nested_i64(obj: Option<&Value>, key: &str) -> i64 {
    as_i64_lenient(obj.and_then(|o| o.get(key)))
}

fn aggregate(row: &Record) -> Record {
    let sims = lenient_json(row.get("activeSim"));
    let data = lenient_json(row.get("consumedData"));

    let sims_active = nested_i64(sims.as_ref(), "activeCards");
    let sims_total = nested_i64(sims.as_ref(), "totalSim");
    let bytes_consumed = nested_i64(data.as_ref(), "consumedData");
    let bytes_limit = nested_i64(data.as_ref(), "limitData");

    let usage_percent = if bytes_limit > 0 {
        let pct = bytes_consumed as f64 / bytes_limit as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    } else {
        0.0
    };

    let mut out = Record::new();
    out.insert(
        "pool_id".to_string(),
        row.get("pool_id").cloned().unwrap_or(Value::Null),
    );
    out.insert(
        "commercialGroup".to_string(),
        row.get("commercialGroup").cloned().unwrap_or(Value::Null),
    );
    out.insert("sims_active".to_string(), Value::Number(sims_active.into()));
    out.insert("sims_total".to_string(), Value::Number(sims_total.into()));
    out.insert(
        "bytes_consumed".to_string(),
        Value::Number(bytes_consumed.into()),
    );
    out.insert("bytes_limit".to_string(), Value::Number(bytes_limit.into()));
    out.insert(
        "usage_percent".to_string(),
        Number::from_f64(usage_percent)
            .map(Value::Number)
            .unwrap_or(Value::Null),
    );
    out
}

/// Aggregate raw pool rows into the flat pool table.
pub fn aggregate_pools(rows: Table) -> Table {
    rows.iter().map(aggregate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: serde_json::Value) -> Table {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_aggregation_from_nested_objects() {
        let rows = table(json!([{
            "pool_id": "pool-1",
            "commercialGroup": "Industrial",
            "activeSim": {"activeCards": 12, "totalSim": 20},
            "consumedData": {"consumedData": 750, "limitData": 1000}
        }]));
        let out = aggregate_pools(rows);
        assert_eq!(out[0]["sims_active"], json!(12));
        assert_eq!(out[0]["sims_total"], json!(20));
        assert_eq!(out[0]["bytes_consumed"], json!(750));
        assert_eq!(out[0]["bytes_limit"], json!(1000));
        assert_eq!(out[0]["usage_percent"], json!(75.0));
    }

    #[test]
    fn test_string_encoded_structures() {
        let rows = table(json!([{
            "pool_id": "pool-2",
            "activeSim": "{'activeCards': 3, 'totalSim': 5}",
            "consumedData": "{'consumedData': 1, 'limitData': 3}"
        }]));
        let out = aggregate_pools(rows);
        assert_eq!(out[0]["sims_active"], json!(3));
        // 1/3 * 100 rounded to two decimals
        assert_eq!(out[0]["usage_percent"], json!(33.33));
    }

    #[test]
    fn test_zero_limit_is_exactly_zero_percent() {
        let rows = table(json!([{
            "pool_id": "pool-3",
            "consumedData": {"consumedData": 9999, "limitData": 0}
        }]));
        let out = aggregate_pools(rows);
        assert_eq!(out[0]["usage_percent"], json!(0.0));
    }

    #[test]
    fn test_malformed_structures_default_to_zero() {
        let rows = table(json!([{
            "pool_id": "pool-4",
            "activeSim": "broken",
            "consumedData": 17
        }]));
        let out = aggregate_pools(rows);
        assert_eq!(out[0]["sims_active"], json!(0));
        assert_eq!(out[0]["sims_total"], json!(0));
        assert_eq!(out[0]["bytes_consumed"], json!(0));
        assert_eq!(out[0]["usage_percent"], json!(0.0));
        // Pass-through identity survives
        assert_eq!(out[0]["pool_id"], json!("pool-4"));
    }
}
