//! Renewal contract enrichment
//!
//! Joins renewal contracts against the fully resolved device table, carrying
//! over the device name, resolved model, and organization. A renewal whose
//! uuid matches no device reports "Device not found". The subscription state
//! falls back to the subscription name field, then to "No subscription",
//! before classification.

use chrono::NaiveDate;
use serde_json::Value;

use crate::labels::renewal_status_label;
use crate::record::{sanitize, Record, Table};
use crate::resolve::{attach_devices_to_renewals, resolve_device_models};

/// Substitute when a renewal has neither a subscription state nor a name.
pub const NO_SUBSCRIPTION: &str = "No subscription";

/// Parse a loosely formatted renewal date and render it as YYYY-MM-DD.
/// Unparseable input becomes None (serialized as null downstream).
fn normalize_date(value: &Value) -> Option<String> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%:z"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn classify_subscription(record: &mut Record) {
    let present = record
        .get("ki_subscription_state")
        .map(|v| !v.is_null())
        .unwrap_or(false);
    if !present {
        let substitute = record
            .get("ki_subscription_name")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::String(NO_SUBSCRIPTION.to_string()));
        record.insert("ki_subscription_state".to_string(), substitute);
    }
    let label = renewal_status_label(record.get("ki_subscription_state"));
    record.insert(
        "ki_subscription_state".to_string(),
        Value::String(label.to_string()),
    );
}

/// Enrich renewal contracts against devices, software, and models.
///
/// The device table is resolved through the full model chain first, then
/// every renewal is left-joined on normalized uuid. An empty renewal table
/// yields an empty table; an empty device table leaves every renewal
/// unresolved rather than aborting.
pub fn enrich_renewals(
    renewals: Table,
    devices: Table,
    software: &Table,
    models: &Table,
) -> Table {
    if renewals.is_empty() {
        return renewals;
    }

    let mut renewals = renewals;
    for renewal in &mut renewals {
        if let Some(raw) = renewal.get("date_to_renew").cloned() {
            let normalized = normalize_date(&raw)
                .map(Value::String)
                .unwrap_or(Value::Null);
            renewal.insert("date_to_renew".to_string(), normalized);
        }
    }

    let (resolved_devices, _outcome) = resolve_device_models(devices, software, models);
    let mut joined = attach_devices_to_renewals(renewals, &resolved_devices);

    for renewal in &mut joined {
        classify_subscription(renewal);
    }

    sanitize(joined)
}
