//! Nested consumption extraction and byte formatting
//!
//! Upstream telemetry carries consumption, presence, and alarm data as nested
//! JSON, sometimes string-encoded and sometimes with single quotes instead of
//! valid JSON quoting. Every extractor here degrades to a zero or "N/A"
//! default on malformed input; nothing in this module can fail.

use serde_json::Value;

pub const BYTES_PER_MB: f64 = 1_048_576.0;
pub const MB_PER_GB: f64 = 1024.0;

/// Decode a possibly string-encoded nested structure.
///
/// An object passes through. A string is parsed as strict JSON first, then
/// retried with single quotes normalized to double quotes. Anything else is
/// treated as absent.
pub fn lenient_json(value: Option<&Value>) -> Option<Value> {
    match value {
        Some(Value::Object(_)) | Some(Value::Array(_)) => value.cloned(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            serde_json::from_str(trimmed)
                .or_else(|_| serde_json::from_str(&trimmed.replace('\'', "\"")))
                .ok()
        }
        _ => None,
    }
}

fn sub_value(obj: &Value, section: &str) -> f64 {
    obj.get(section)
        .and_then(|s| s.get("value"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Total consumption in bytes: voice + sms + data, each defaulting to 0.
pub fn total_consumption(consumption: Option<&Value>) -> f64 {
    match consumption {
        Some(obj) if obj.is_object() => {
            sub_value(obj, "voice") + sub_value(obj, "sms") + sub_value(obj, "data")
        }
        _ => 0.0,
    }
}

/// Render a byte count as "12.34 MB" or "1.20 GB" (at or above 1024 MB).
/// Zero, negative, or non-finite input renders as "0 MB".
pub fn format_bytes(value_bytes: f64) -> String {
    if !value_bytes.is_finite() || value_bytes == 0.0 {
        return "0 MB".to_string();
    }
    let mb = value_bytes / BYTES_PER_MB;
    if mb >= MB_PER_GB {
        format!("{:.2} GB", mb / MB_PER_GB)
    } else {
        format!("{:.2} MB", mb)
    }
}

/// Bucket an MB value into a business usage tier.
pub fn usage_tier(mb_value: f64) -> &'static str {
    if !mb_value.is_finite() || mb_value <= 0.0 {
        "Inactive (0 MB)"
    } else if mb_value < 1.0 {
        "Low"
    } else if mb_value < 10.0 {
        "Medium"
    } else if mb_value < 100.0 {
        "High"
    } else {
        "Extreme"
    }
}

/// Count alarms in a (possibly string-encoded) alarm list.
pub fn alarm_count(value: Option<&Value>) -> i64 {
    match lenient_json(value) {
        Some(Value::Array(items)) => items.len() as i64,
        _ => 0,
    }
}

/// Extract the operator country code from a nested presence structure.
pub fn country_code(presence: Option<&Value>) -> String {
    lenient_json(presence)
        .as_ref()
        .and_then(|obj| obj.get("sgsn"))
        .and_then(|sgsn| sgsn.get("operator"))
        .and_then(|operator| operator.get("countryCode"))
        .and_then(Value::as_str)
        .filter(|code| !code.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_json_accepts_single_quoted() {
        let parsed = lenient_json(Some(&json!("{'data': {'value': 5}}"))).unwrap();
        assert_eq!(parsed["data"]["value"], json!(5));
    }

    #[test]
    fn test_lenient_json_malformed_is_absent() {
        assert!(lenient_json(Some(&json!("not json"))).is_none());
        assert!(lenient_json(Some(&json!(42))).is_none());
        assert!(lenient_json(Some(&Value::Null)).is_none());
        assert!(lenient_json(None).is_none());
    }

    #[test]
    fn test_total_consumption_sums_sections() {
        let c = json!({"voice": {"value": 100}, "sms": {"value": 20}, "data": {"value": 3}});
        assert_eq!(total_consumption(Some(&c)), 123.0);
    }

    #[test]
    fn test_total_consumption_defaults_missing_sections() {
        let c = json!({"data": {"value": 512}});
        assert_eq!(total_consumption(Some(&c)), 512.0);
        assert_eq!(total_consumption(Some(&json!("garbage"))), 0.0);
        assert_eq!(total_consumption(None), 0.0);
    }

    #[test]
    fn test_format_bytes_mb_and_gb_boundaries() {
        assert_eq!(format_bytes(1_048_576.0), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_824.0), "1.00 GB");
        // Just below 1024 MB stays in MB
        assert_eq!(format_bytes(1023.0 * BYTES_PER_MB), "1023.00 MB");
        assert_eq!(format_bytes(0.0), "0 MB");
        assert_eq!(format_bytes(1.2 * 1024.0 * BYTES_PER_MB), "1.20 GB");
    }

    #[test]
    fn test_usage_tier_boundaries() {
        assert_eq!(usage_tier(0.0), "Inactive (0 MB)");
        assert_eq!(usage_tier(-3.0), "Inactive (0 MB)");
        assert_eq!(usage_tier(0.999), "Low");
        assert_eq!(usage_tier(1.0), "Medium");
        assert_eq!(usage_tier(9.999), "Medium");
        assert_eq!(usage_tier(10.0), "High");
        assert_eq!(usage_tier(99.999), "High");
        assert_eq!(usage_tier(100.0), "Extreme");
        assert_eq!(usage_tier(f64::NAN), "Inactive (0 MB)");
    }

    #[test]
    fn test_alarm_count() {
        assert_eq!(alarm_count(Some(&json!([{"id": 1}, {"id": 2}]))), 2);
        assert_eq!(alarm_count(Some(&json!("[1, 2, 3]"))), 3);
        assert_eq!(alarm_count(Some(&json!({"not": "a list"}))), 0);
        assert_eq!(alarm_count(None), 0);
    }

    #[test]
    fn test_country_code_nested_and_fallback() {
        let presence = json!({"sgsn": {"operator": {"countryCode": "ES"}}});
        assert_eq!(country_code(Some(&presence)), "ES");
        let string_encoded = json!("{'sgsn': {'operator': {'countryCode': 'DE'}}}");
        assert_eq!(country_code(Some(&string_encoded)), "DE");
        assert_eq!(country_code(Some(&json!({"sgsn": {}}))), "N/A");
        assert_eq!(country_code(None), "N/A");
    }
}
