//! Application state management

use std::sync::Arc;

use anyhow::Result;
use axon_client::UpstreamClient;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Upstream fetch client
    pub client: UpstreamClient,
    /// Configuration
    pub config: Config,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let client = UpstreamClient::new(config.to_client_config())?;
        Ok(Arc::new(Self { client, config }))
    }
}
