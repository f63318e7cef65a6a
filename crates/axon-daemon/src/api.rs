//! REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use axon_client::Resource;
use axon_core::{
    aggregate_pools, enrich_boards, enrich_gateways, enrich_renewals, paginate,
    process_device_info, process_telemetry, Table,
};

use crate::export;
use crate::state::AppState;

/// API error response
#[derive(Serialize)]
pub struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Limit/offset slicing over an already-enriched table
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One enriched dashboard dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Boards,
    Gateways,
    Renewals,
    Pools,
    Sims,
    Info,
}

impl Dataset {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "boards" => Some(Dataset::Boards),
            "gateways" => Some(Dataset::Gateways),
            "renewals" => Some(Dataset::Renewals),
            "pools" => Some(Dataset::Pools),
            "sims" => Some(Dataset::Sims),
            "info" => Some(Dataset::Info),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Boards => "boards",
            Dataset::Gateways => "gateways",
            Dataset::Renewals => "renewals",
            Dataset::Pools => "pools",
            Dataset::Sims => "sims",
            Dataset::Info => "info",
        }
    }
}

/// Fetch the dataset's source resources concurrently and run its pipeline.
/// Joins block until all of their inputs have arrived; partial results are
/// never merged.
pub async fn assemble(state: &AppState, dataset: Dataset) -> Table {
    match dataset {
        Dataset::Boards => {
            let (devices, models, software) = tokio::join!(
                state.client.fetch(Resource::Boards, &[]),
                state.client.fetch(Resource::Models, &[]),
                state.client.fetch(Resource::Software, &[]),
            );
            enrich_boards(devices, &software, &models)
        }
        Dataset::Gateways => {
            let (devices, software) = tokio::join!(
                state.client.fetch(Resource::Gateways, &[]),
                state.client.fetch(Resource::Software, &[]),
            );
            enrich_gateways(devices, &software)
        }
        Dataset::Renewals => {
            let (renewals, devices, models, software) = tokio::join!(
                state.client.fetch_renewals(None),
                state.client.fetch(Resource::Boards, &[]),
                state.client.fetch(Resource::Models, &[]),
                state.client.fetch(Resource::Software, &[]),
            );
            enrich_renewals(renewals, devices, &software, &models)
        }
        Dataset::Pools => aggregate_pools(state.client.fetch(Resource::Pools, &[]).await),
        Dataset::Sims => process_telemetry(state.client.fetch_sim_telemetry().await),
        Dataset::Info => {
            process_device_info(state.client.fetch(Resource::DeviceInfo, &[]).await)
        }
    }
}

fn page(state: &AppState, params: PageParams, table: Table) -> Table {
    let limit = params.limit.unwrap_or(state.config.daemon.page_limit);
    let offset = params.offset.unwrap_or(0);
    paginate(table, offset, limit)
}

async fn dashboard(
    state: Arc<AppState>,
    params: PageParams,
    dataset: Dataset,
) -> impl IntoResponse {
    let table = assemble(&state, dataset).await;
    Json(page(&state, params, table))
}

pub async fn boards_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Boards).await
}

pub async fn gateways_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Gateways).await
}

pub async fn renewals_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Renewals).await
}

pub async fn pools_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Pools).await
}

pub async fn sims_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Sims).await
}

pub async fn info_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    dashboard(state, params, Dataset::Info).await
}

/// Run a dataset pipeline and dump the full enriched table to a CSV file in
/// the configured export directory. Debug sink only.
pub async fn export_dataset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let dataset = match Dataset::parse(&name) {
        Some(d) => d,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(format!("Unknown dataset: {}", name))),
            )
                .into_response()
        }
    };

    let dir = match &state.config.export.dir {
        Some(dir) => dir.clone(),
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("Export directory is not configured")),
            )
                .into_response()
        }
    };

    let table = assemble(&state, dataset).await;
    let path = std::path::Path::new(&dir).join(format!("{}.csv", dataset.name()));
    match export::write_csv(&path, &table) {
        Ok(()) => {
            info!(dataset = %dataset.name(), path = %path.display(), rows = table.len(), "Exported dataset");
            Json(serde_json::json!({
                "status": "exported",
                "path": path.display().to_string(),
                "rows": table.len()
            }))
            .into_response()
        }
        Err(e) => {
            warn!(dataset = %dataset.name(), error = %e, "Export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(format!("Export failed: {}", e))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_parse() {
        assert_eq!(Dataset::parse("boards"), Some(Dataset::Boards));
        assert_eq!(Dataset::parse("sims"), Some(Dataset::Sims));
        assert_eq!(Dataset::parse("nonsense"), None);
    }
}
