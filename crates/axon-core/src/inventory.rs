//! Device firmware inventory
//!
//! Each device reports a nested `info` blob with its agent version and
//! firmware compilation date. Devices compiled on or after the current
//! firmware baseline count as up to date.

use chrono::NaiveDate;
use serde_json::Value;

use crate::record::{sanitize, Table};
use crate::usage::lenient_json;

/// Firmware baseline: builds from this date onward are considered current.
const BASELINE: (i32, u32, u32) = (2025, 6, 1);

fn update_status(compiled_at: Option<&str>) -> &'static str {
    let raw = match compiled_at {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return "No data",
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => {
            let (y, m, d) = BASELINE;
            // Baseline date is fixed and valid
            let cutoff = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            if date >= cutoff {
                "Updated"
            } else {
                "Outdated"
            }
        }
        Err(_) => "Unknown",
    }
}

/// Flatten each device's nested `info` blob into agent version, compilation
/// date, and update status columns. Rows without an `info` field get the
/// "No data" status.
pub fn process_device_info(mut rows: Table) -> Table {
    for row in &mut rows {
        let info = lenient_json(row.get("info"));
        let agent_version = info
            .as_ref()
            .and_then(|i| i.get("agent_version"))
            .and_then(Value::as_str)
            .map(|s| Value::String(s.to_string()))
            .unwrap_or(Value::Null);
        let compiled_at = info
            .as_ref()
            .and_then(|i| i.get("compilation_date"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let status = update_status(compiled_at.as_deref());

        row.insert("agent_version".to_string(), agent_version);
        row.insert(
            "compilation_date".to_string(),
            compiled_at.map(Value::String).unwrap_or(Value::Null),
        );
        row.insert("update_status".to_string(), Value::String(status.to_string()));
    }
    sanitize(rows)
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
    fn test_updated_and_outdated() {
        let rows = table(json!([
            {"uuid": "a", "info": {"agent_version": "2.4.1", "compilation_date": "2025-07-10"}},
            {"uuid": "b", "info": {"compilation_date": "2024-11-02"}},
        ]));
        let out = process_device_info(rows);
        assert_eq!(out[0]["update_status"], json!("Updated"));
        assert_eq!(out[0]["agent_version"], json!("2.4.1"));
        assert_eq!(out[1]["update_status"], json!("Outdated"));
        assert_eq!(out[1]["agent_version"], Value::Null);
    }

    #[test]
    fn test_string_encoded_info_blob() {
        let rows = table(json!([
            {"uuid": "c", "info": "{'compilation_date': '2025-06-01'}"}
        ]));
        let out = process_device_info(rows);
        // Baseline day itself counts as updated
        assert_eq!(out[0]["update_status"], json!("Updated"));
    }

    #[test]
    fn test_missing_and_malformed_dates() {
        let rows = table(json!([
            {"uuid": "d"},
            {"uuid": "e", "info": {"compilation_date": "next tuesday"}},
        ]));
        let out = process_device_info(rows);
        assert_eq!(out[0]["update_status"], json!("No data"));
        assert_eq!(out[1]["update_status"], json!("Unknown"));
    }
}
