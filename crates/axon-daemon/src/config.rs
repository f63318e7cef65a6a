//! Configuration loading and validation

use anyhow::Result;
use axon_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Bind address for web server
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Default page size for dashboard endpoints
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    /// TLS configuration (optional - enables HTTPS when present)
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            page_limit: default_page_limit(),
            tls: None,
        }
    }
}

/// TLS/HTTPS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM format)
    pub cert: String,
    /// Path to private key file (PEM format)
    pub key: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_page_limit() -> usize {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream core API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Tenant scope for SIM telemetry
    #[serde(default)]
    pub tenant_uuid: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant_uuid: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://core.example.com/api".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for CSV debug exports; exports are disabled when unset
    #[serde(default)]
    pub dir: Option<String>,
}

impl Config {
    /// Build the upstream client config. Credentials come from the
    /// AXON_USERNAME / AXON_PASSWORD environment, never from the file.
    pub fn to_client_config(&self) -> ClientConfig {
        let username = std::env::var("AXON_USERNAME").unwrap_or_default();
        let password = std::env::var("AXON_PASSWORD").unwrap_or_default();
        if username.is_empty() {
            warn!("AXON_USERNAME is not set; upstream login will fail");
        }
        ClientConfig {
            base_url: self.upstream.base_url.clone(),
            tenant_uuid: self.upstream.tenant_uuid.clone(),
            username,
            password,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config {
            daemon: DaemonConfig::default(),
            upstream: UpstreamConfig::default(),
            export: ExportConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.daemon.bind, "0.0.0.0:8080");
        assert_eq!(config.daemon.page_limit, 100);
        assert!(config.daemon.tls.is_none());
        assert!(config.export.dir.is_none());
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
            [daemon]
            bind = "127.0.0.1:9000"

            [upstream]
            base_url = "https://fleet.internal/api"
            tenant_uuid = "t-1"
            "#,
        )
        .unwrap();
        assert_eq!(config.daemon.bind, "127.0.0.1:9000");
        assert_eq!(config.daemon.page_limit, 100);
        assert_eq!(config.upstream.base_url, "https://fleet.internal/api");
        assert_eq!(config.upstream.tenant_uuid, "t-1");
    }
}
