//! Per-SIM usage telemetry pipeline
//!
//! Flattens raw M2M telemetry rows into a fixed, display-ready column set:
//! identity, lifecycle label, rate plan, network generation, organization,
//! presence country, alarm count, and daily/monthly consumption in bytes,
//! MB, tier, and human-readable form.

use serde_json::{Number, Value};

use crate::labels::{lifecycle_label, network_type_label};
use crate::record::{non_empty_str, Record, Table};
use crate::usage::{
    alarm_count, country_code, format_bytes, lenient_json, total_consumption, usage_tier,
    BYTES_PER_MB,
};

/// Default rate plan label when no service pack is assigned.
pub const NO_PLAN: &str = "No plan";

fn json_f64(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn project(row: &Record) -> Record {
    let mut out = Record::new();

    let iccid = non_empty_str(row, "icc").unwrap_or_else(|| "N/A".to_string());
    out.insert("iccid".to_string(), Value::String(iccid));

    out.insert(
        "status_clean".to_string(),
        Value::String(lifecycle_label(row.get("lifeCycleStatus"))),
    );
    let rate_plan = non_empty_str(row, "servicePack").unwrap_or_else(|| NO_PLAN.to_string());
    out.insert("rate_plan".to_string(), Value::String(rate_plan));
    out.insert(
        "network_type".to_string(),
        Value::String(network_type_label(row.get("ratType")).to_string()),
    );
    let organization = non_empty_str(row, "customField1").unwrap_or_else(|| "N/A".to_string());
    out.insert("organization".to_string(), Value::String(organization));

    out.insert(
        "country_code".to_string(),
        Value::String(country_code(row.get("presence"))),
    );
    out.insert(
        "alarm_count".to_string(),
        Value::Number(alarm_count(row.get("alarms")).into()),
    );

    let daily = total_consumption(lenient_json(row.get("consumptionDaily")).as_ref());
    let monthly = total_consumption(lenient_json(row.get("consumptionMonthly")).as_ref());
    let daily_mb = daily / BYTES_PER_MB;
    let monthly_mb = monthly / BYTES_PER_MB;

    out.insert("cons_daily_mb".to_string(), json_f64(daily_mb));
    out.insert("cons_month_mb".to_string(), json_f64(monthly_mb));
    out.insert(
        "usage_tier_daily".to_string(),
        Value::String(usage_tier(daily_mb).to_string()),
    );
    out.insert(
        "usage_tier_month".to_string(),
        Value::String(usage_tier(monthly_mb).to_string()),
    );
    out.insert(
        "cons_daily_readable".to_string(),
        Value::String(format_bytes(daily)),
    );
    out.insert(
        "cons_month_readable".to_string(),
        Value::String(format_bytes(monthly)),
    );

    out
}

/// Process raw SIM telemetry into the fixed projected column set. Tiers are
/// computed independently for the daily and monthly windows.
pub fn process_telemetry(rows: Table) -> Table {
    rows.iter().map(project).collect()
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
    fn test_full_projection() {
        let rows = table(json!([{
            "icc": "8934567890",
            "lifeCycleStatus": "ACTIVE",
            "servicePack": "IoT 5MB",
            "ratType": 6,
            "customField1": "Acme",
            "consumptionDaily": {"data": {"value": 2_097_152}},
            "consumptionMonthly": "{'data': {'value': 209715200}, 'sms': {'value': 0}}",
            "presence": {"sgsn": {"operator": {"countryCode": "ES"}}},
            "alarms": [{"id": 1}]
        }]));

        let out = process_telemetry(rows);
        let row = &out[0];
        assert_eq!(row["iccid"], json!("8934567890"));
        assert_eq!(row["status_clean"], json!("Active"));
        assert_eq!(row["rate_plan"], json!("IoT 5MB"));
        assert_eq!(row["network_type"], json!("4G"));
        assert_eq!(row["organization"], json!("Acme"));
        assert_eq!(row["country_code"], json!("ES"));
        assert_eq!(row["alarm_count"], json!(1));
        assert_eq!(row["cons_daily_mb"], json!(2.0));
        assert_eq!(row["usage_tier_daily"], json!("Medium"));
        assert_eq!(row["usage_tier_month"], json!("Extreme"));
        assert_eq!(row["cons_daily_readable"], json!("2.00 MB"));
        assert_eq!(row["cons_month_readable"], json!("200.00 MB"));
    }

    #[test]
    fn test_sparse_row_gets_all_defaults() {
        let out = process_telemetry(table(json!([{}])));
        let row = &out[0];
        assert_eq!(row["iccid"], json!("N/A"));
        assert_eq!(row["status_clean"], json!("Unknown"));
        assert_eq!(row["rate_plan"], json!("No plan"));
        assert_eq!(row["network_type"], json!("N/A"));
        assert_eq!(row["organization"], json!("N/A"));
        assert_eq!(row["country_code"], json!("N/A"));
        assert_eq!(row["alarm_count"], json!(0));
        assert_eq!(row["cons_daily_mb"], json!(0.0));
        assert_eq!(row["usage_tier_daily"], json!("Inactive (0 MB)"));
        assert_eq!(row["cons_daily_readable"], json!("0 MB"));
    }

    #[test]
    fn test_malformed_consumption_is_zero() {
        let rows = table(json!([{
            "icc": "111",
            "consumptionDaily": "corrupt {{{",
            "consumptionMonthly": 42
        }]));
        let out = process_telemetry(rows);
        assert_eq!(out[0]["cons_daily_mb"], json!(0.0));
        assert_eq!(out[0]["cons_month_mb"], json!(0.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(process_telemetry(Vec::new()).is_empty());
    }
}
