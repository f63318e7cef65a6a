//! Board and gateway enrichment
//!
//! Produces the display-ready device tables: resolved model names, owning
//! organization, and classified connectivity/enabled labels. Boards carry an
//! organization from their `final_client`; the gateway family has no client
//! assignment upstream and always reports "Unassigned".

use serde_json::Value;

use crate::labels::{connectivity_label, enabled_label};
use crate::record::{non_empty_str, sanitize, Record, Table};
use crate::resolve::resolve_device_models;

/// Sentinel organization when no final client is assigned.
pub const UNASSIGNED: &str = "Unassigned";

/// Raw state may live under either `state` or `status` depending on the
/// device family.
fn raw_state(record: &Record) -> Option<&Value> {
    record.get("state").or_else(|| record.get("status"))
}

fn classify_state(record: &mut Record) {
    let status = connectivity_label(raw_state(record));
    let enabled = enabled_label(raw_state(record));
    record.insert("status_clean".to_string(), Value::String(status.to_string()));
    record.insert("enabled_clean".to_string(), Value::String(enabled.to_string()));
}

/// Enrich the board family: model chain resolution, organization, and state
/// labels. An empty board table yields an empty table.
pub fn enrich_boards(devices: Table, software: &Table, models: &Table) -> Table {
    if devices.is_empty() {
        return devices;
    }

    let (mut enriched, _outcome) = resolve_device_models(devices, software, models);

    for record in &mut enriched {
        let organization = non_empty_str(record, "final_client")
            .unwrap_or_else(|| UNASSIGNED.to_string());
        record.insert("organization".to_string(), Value::String(organization));
        classify_state(record);
    }

    sanitize(enriched)
}

/// Enrich the gateway family. Same resolution chain as boards; the gateway
/// catalog has no model hop of its own, so unresolved entries fall back to
/// the device name or ssid.
pub fn enrich_gateways(devices: Table, software: &Table) -> Table {
    if devices.is_empty() {
        return devices;
    }

    let (mut enriched, _outcome) = resolve_device_models(devices, software, &Vec::new());

    for record in &mut enriched {
        record.insert(
            "organization".to_string(),
            Value::String(UNASSIGNED.to_string()),
        );
        classify_state(record);
    }

    sanitize(enriched)
}
