//! Upstream resource declarations
//!
//! Every fetchable dataset is declared here with its endpoint path. The
//! response shape is also declared (see `shape`): a resource either returns
//! a bare list or wraps it in one of the declared envelope keys. Nothing is
//! discovered heuristically at runtime.

/// A fetchable upstream dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Board-family devices
    Boards,
    /// Gateway-family devices
    Gateways,
    /// Device model catalog
    Models,
    /// Software version catalog
    Software,
    /// Renewal contracts
    Renewals,
    /// Per-device firmware info
    DeviceInfo,
    /// SIM pools
    Pools,
    /// Per-SIM usage telemetry
    SimTelemetry,
}

impl Resource {
    /// Endpoint path relative to the upstream base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Boards => "/boards",
            Resource::Gateways => "/gateways",
            Resource::Models => "/models",
            Resource::Software => "/versions",
            Resource::Renewals => "/boards/renewals",
            Resource::DeviceInfo => "/boards/info",
            Resource::Pools => "/pools",
            Resource::SimTelemetry => "/m2m",
        }
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Boards => "boards",
            Resource::Gateways => "gateways",
            Resource::Models => "models",
            Resource::Software => "software",
            Resource::Renewals => "renewals",
            Resource::DeviceInfo => "device-info",
            Resource::Pools => "pools",
            Resource::SimTelemetry => "sim-telemetry",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
