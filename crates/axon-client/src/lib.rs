//! Axon Client - Authenticated upstream fetch collaborator
//!
//! Wraps the fleet core API: session login with token renewal, one `fetch`
//! per declared resource, and graceful degradation. A failed or empty fetch
//! always yields an empty table, never an error; the pipeline downstream
//! treats both identically.

pub mod client;
pub mod resource;
pub mod shape;

pub use client::{ClientConfig, UpstreamClient};
pub use resource::Resource;
pub use shape::extract_rows;
