//! Chained join resolver
//!
//! Resolves a device's real-world model name through the foreign-key chain
//! `Device.version_uuid -> SoftwareVersion.uuid -> SoftwareVersion.model_uuid
//! -> Model.uuid -> Model.name`, and enriches renewals against the resolved
//! device table. All keys are compared only after normalization.
//!
//! Each join stage reports an explicit outcome instead of failing: a missing
//! intermediate table degrades that hop to an all-"Unknown" fill, and an
//! empty device table short-circuits to an empty result. Right-hand tables
//! are deduplicated on their join key (first occurrence in original order
//! wins), so a join never changes the cardinality of the driving table.

use std::collections::HashMap;

use serde_json::Value;

use crate::key::normalize_field;
use crate::record::{non_empty_str, Record, Table};

/// Sentinel for a device whose model could not be resolved by any source.
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Sentinel for a renewal whose device is not in the device table.
pub const DEVICE_NOT_FOUND: &str = "Device not found";

/// Outcome of one join stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The hop was applied with a populated right-hand table.
    Applied,
    /// The hop degraded to sentinel fills; the reason says why.
    Degraded(&'static str),
}

/// Index a table by the normalized value of `key_field`, keeping the first
/// occurrence of each key. Rows whose key normalizes to `""` never index.
pub fn index_by_key<'a>(table: &'a Table, key_field: &str) -> HashMap<String, &'a Record> {
    let mut index: HashMap<String, &'a Record> = HashMap::with_capacity(table.len());
    for record in table {
        let key = normalize_field(record, key_field);
        if key.is_empty() {
            continue;
        }
        index.entry(key).or_insert(record);
    }
    index
}

/// Resolve `real_model_name` for every device via the two-hop chain, then
/// apply the fallback chain (device name, then ssid) wherever the chain left
/// "Unknown". Also mirrors the result into `model`.
///
/// Returns the enriched device table (same rows, same order) and the chain
/// outcome.
pub fn resolve_device_models(
    mut devices: Table,
    software: &Table,
    models: &Table,
) -> (Table, JoinOutcome) {
    if devices.is_empty() {
        return (devices, JoinOutcome::Degraded("empty device table"));
    }

    let outcome = if software.is_empty() {
        JoinOutcome::Degraded("software catalog unavailable")
    } else if models.is_empty() {
        JoinOutcome::Degraded("model catalog unavailable")
    } else {
        JoinOutcome::Applied
    };

    // version_uuid -> model_uuid, projecting only the hop column
    let software_index = index_by_key(software, "uuid");
    let model_index = index_by_key(models, "uuid");

    for device in &mut devices {
        let version_key = normalize_field(device, "version_uuid");
        let resolved = software_index
            .get(&version_key)
            .map(|sw| normalize_field(sw, "model_uuid"))
            .filter(|model_key| !model_key.is_empty())
            .and_then(|model_key| model_index.get(&model_key).copied())
            .and_then(|model| non_empty_str(model, "name"));

        let mut name = resolved.unwrap_or_else(|| UNKNOWN_MODEL.to_string());

        if name == UNKNOWN_MODEL {
            if let Some(fallback) =
                non_empty_str(device, "name").or_else(|| non_empty_str(device, "ssid"))
            {
                name = fallback;
            }
        }

        device.insert("real_model_name".to_string(), Value::String(name.clone()));
        device.insert("model".to_string(), Value::String(name));
    }

    if let JoinOutcome::Degraded(reason) = &outcome {
        tracing::warn!(reason = %reason, "Model resolution degraded to fallback names");
    }
    (devices, outcome)
}

/// Columns carried from a resolved device onto a matching renewal.
const RENEWAL_DEVICE_COLUMNS: [&str; 4] =
    ["name", "real_model_name", "organization", "final_client"];

/// Left-join renewals against a fully resolved device table on normalized
/// uuid. Unresolved renewals get the "Device not found" sentinel; `model`
/// always mirrors `real_model_name`.
pub fn attach_devices_to_renewals(mut renewals: Table, resolved_devices: &Table) -> Table {
    let device_index = index_by_key(resolved_devices, "uuid");

    for renewal in &mut renewals {
        let key = normalize_field(renewal, "uuid");
        match device_index.get(&key) {
            Some(device) => {
                for column in RENEWAL_DEVICE_COLUMNS {
                    // Device name lands as device_name so the renewal's own
                    // fields are never overwritten.
                    let target = if column == "name" { "device_name" } else { column };
                    let value = device.get(column).cloned().unwrap_or(Value::Null);
                    renewal.insert(target.to_string(), value);
                }
                if renewal
                    .get("real_model_name")
                    .map(|v| v.is_null())
                    .unwrap_or(true)
                {
                    renewal.insert(
                        "real_model_name".to_string(),
                        Value::String(DEVICE_NOT_FOUND.to_string()),
                    );
                }
            }
            None => {
                renewal.insert(
                    "real_model_name".to_string(),
                    Value::String(DEVICE_NOT_FOUND.to_string()),
                );
            }
        }
        let model = renewal
            .get("real_model_name")
            .cloned()
            .unwrap_or(Value::Null);
        renewal.insert("model".to_string(), model);
    }
    renewals
}
