//! Authenticated upstream HTTP client
//!
//! Holds the session token behind an async lock and renews it transparently:
//! the first request logs in on demand, and a 401 triggers exactly one
//! re-login and retry. Every fetch degrades to an empty table on failure;
//! upstream availability is never the pipeline's problem.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use axon_core::Table;

use crate::resource::Resource;
use crate::shape::extract_rows;

/// Default renewal window when the caller asks for everything.
const RENEWALS_FROM: &str = "2020-01-01";
const RENEWALS_TO: &str = "2035-01-01";

/// Connection settings for the upstream core API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the upstream API, e.g. "https://core.example.com/api"
    pub base_url: String,
    /// Tenant scope for SIM telemetry queries
    pub tenant_uuid: String,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    login: bool,
    #[serde(rename = "apiToken")]
    api_token: Option<String>,
}

/// Upstream fetch client with session renewal.
pub struct UpstreamClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
}

impl UpstreamClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Log in and store the session token. Returns an error when the
    /// upstream rejects the credentials.
    pub async fn login(&self) -> Result<()> {
        let url = self.url("/users/sign-in");
        let body = LoginRequest {
            username: &self.config.username,
            password: &self.config.password,
        };
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Login request failed")?
            .error_for_status()
            .context("Login rejected")?;

        let login: LoginResponse = response.json().await.context("Malformed login response")?;
        match (login.login, login.api_token) {
            (true, Some(token)) => {
                info!("Upstream session established");
                *self.token.write().await = Some(token);
                Ok(())
            }
            _ => anyhow::bail!("Login refused by upstream"),
        }
    }

    async fn ensure_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }
        self.login().await?;
        self.token
            .read()
            .await
            .clone()
            .context("Login succeeded but no token stored")
    }

    async fn get_json(
        &self,
        resource: Resource,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value> {
        let url = self.url(resource.path());
        let mut renewed = false;
        loop {
            let token = self.ensure_token().await?;
            debug!(resource = %resource, url = %url, "Fetching upstream resource");
            let response = self
                .http
                .get(&url)
                .header("Authorization", format!("Basic {}", token))
                .query(params)
                .send()
                .await
                .context("Request failed")?;

            if response.status() == reqwest::StatusCode::UNAUTHORIZED && !renewed {
                // Session expired; renew once and retry
                info!(resource = %resource, "Session expired, renewing");
                *self.token.write().await = None;
                renewed = true;
                continue;
            }

            let response = response.error_for_status().context("Upstream error status")?;
            return response.json().await.context("Malformed response body");
        }
    }

    /// Fetch one resource as a table. Any transport, auth, or shape problem
    /// degrades to an empty table with a warning.
    pub async fn fetch(&self, resource: Resource, params: &[(&str, &str)]) -> Table {
        match self.get_json(resource, params).await {
            Ok(body) => {
                let table = extract_rows(resource, body);
                debug!(resource = %resource, rows = table.len(), "Fetched upstream resource");
                table
            }
            Err(e) => {
                warn!(resource = %resource, error = %e, "Fetch degraded to empty dataset");
                Table::new()
            }
        }
    }

    /// Fetch renewal contracts. Without an explicit window the full default
    /// range is requested with `showAll`.
    pub async fn fetch_renewals(&self, window: Option<(&str, &str)>) -> Table {
        match window {
            Some((from, to)) => {
                self.fetch(Resource::Renewals, &[("from", from), ("to", to)])
                    .await
            }
            None => {
                self.fetch(
                    Resource::Renewals,
                    &[
                        ("showAll", "true"),
                        ("from", RENEWALS_FROM),
                        ("to", RENEWALS_TO),
                    ],
                )
                .await
            }
        }
    }

    /// Fetch per-SIM telemetry scoped to the configured tenant.
    pub async fn fetch_sim_telemetry(&self) -> Table {
        let tenant = self.config.tenant_uuid.clone();
        self.fetch(Resource::SimTelemetry, &[("tenant_uuid", tenant.as_str())])
            .await
    }
}
