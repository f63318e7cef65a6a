//! Axon Core - Reconciliation and enrichment pipeline
//!
//! This crate provides the pure, in-memory transforms of the Axon system:
//! - Loosely-typed record tables and the final-output sanitizer
//! - Join-key normalization and the chained device/model resolver
//! - Status, lifecycle, renewal, and network-type classifiers
//! - Nested consumption extraction and SIM pool aggregation
//! - Limit/offset pagination over enriched tables
//!
//! The pipeline performs no I/O and holds no state across invocations;
//! every transform takes fully materialized tables and returns a fresh one.

pub mod boards;
pub mod error;
pub mod inventory;
pub mod key;
pub mod labels;
pub mod page;
pub mod pool;
pub mod record;
pub mod renewals;
pub mod resolve;
pub mod telemetry;
pub mod usage;

pub use boards::{enrich_boards, enrich_gateways};
pub use error::PipelineError;
pub use inventory::process_device_info;
pub use page::paginate;
pub use pool::aggregate_pools;
pub use record::{sanitize, tabulate, Record, Table};
pub use renewals::enrich_renewals;
pub use resolve::JoinOutcome;
pub use telemetry::process_telemetry;
