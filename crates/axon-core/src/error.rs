//! Pipeline boundary errors
//!
//! Per-row problems (missing join keys, malformed nested values, empty
//! upstream datasets) are always recovered locally with sentinel values and
//! never reach this type. The only error the pipeline can surface is input
//! that cannot be tabulated at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Resource '{resource}' cannot be tabulated: expected a list of records, got {shape}")]
    Untabulatable { resource: String, shape: String },
}
