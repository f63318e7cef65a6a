//! Raw-code to business-label classifiers
//!
//! Pure, total functions over constant match tables. Every classifier has a
//! documented default, so an unmapped raw code always yields a label and
//! never an error. Upstream state codes are matched case-insensitively; some
//! of them are legacy Spanish manufacturing states ("terminado", "asignado",
//! "fabricado") that the upstream still emits.

use serde_json::Value;

use crate::key::normalize;

const CONNECTED_CODES: [&str; 4] = ["terminado", "online", "connected", "true"];
const ENABLED_CODES: [&str; 5] = ["terminado", "asignado", "fabricado", "true", "enabled"];

/// Connectivity: raw device state to Connected/Disconnected.
pub fn connectivity_label(raw: Option<&Value>) -> &'static str {
    let code = raw.map(normalize).unwrap_or_default();
    if CONNECTED_CODES.contains(&code.as_str()) {
        "Connected"
    } else {
        "Disconnected"
    }
}

/// Enabled: raw device state to Enabled/Disabled.
pub fn enabled_label(raw: Option<&Value>) -> &'static str {
    let code = raw.map(normalize).unwrap_or_default();
    if ENABLED_CODES.contains(&code.as_str()) {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// SIM lifecycle status. Unmapped codes pass through as-is so an unexpected
/// upstream state stays visible; a missing value becomes "Unknown".
pub fn lifecycle_label(raw: Option<&Value>) -> String {
    let original = match raw {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim(),
        _ => return "Unknown".to_string(),
    };
    match original.to_uppercase().as_str() {
        "ACTIVE" => "Active".to_string(),
        "ACTIVATION_READY" => "Ready to activate".to_string(),
        "DEACTIVATED" => "Deactivated".to_string(),
        "INACTIVE_NEW" => "New inactive".to_string(),
        "TEST" => "Test".to_string(),
        _ => original.to_string(),
    }
}

/// Renewal subscription status. Anything unmapped defaults to "Inactive".
pub fn renewal_status_label(raw: Option<&Value>) -> &'static str {
    let code = raw.map(normalize).unwrap_or_default();
    match code.as_str() {
        "active" => "Active",
        "inactive" => "Inactive",
        "cancelled" => "Cancelled",
        "not-applicable" => "Not applicable",
        _ => "Inactive",
    }
}

/// Radio access technology code to network generation.
pub fn network_type_label(raw: Option<&Value>) -> &'static str {
    let code = match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match code {
        Some(1) => "3G",
        Some(2) => "2G",
        Some(5) => "3.5G",
        Some(6) => "4G",
        Some(8) => "NB-IoT",
        _ => "N/A",
    }
}
