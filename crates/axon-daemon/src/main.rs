//! Axon Daemon - Main entry point
//!
//! Serves the enriched fleet dashboards over a REST API, fetching upstream
//! datasets on demand and running the reconciliation pipeline per request.

mod api;
mod config;
mod export;
mod server;
mod state;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "axon")]
#[command(about = "IoT fleet reconciliation and reporting daemon")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "axon.toml")]
    config: PathBuf,

    /// Bind address for web server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run one dataset pipeline (boards, gateways, renewals, pools, sims,
    /// info), print the enriched table as JSON, and exit
    #[arg(long)]
    dump: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Axon v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override bind address if specified
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    info!(
        upstream = %config.upstream.base_url,
        bind = %config.daemon.bind,
        "Configuration loaded"
    );

    // Create application state
    let state = state::AppState::new(config.clone())?;

    if let Some(name) = args.dump {
        // Single-run mode: assemble one dataset and print it
        let dataset = api::Dataset::parse(&name)
            .ok_or_else(|| anyhow::anyhow!("Unknown dataset: {}", name))?;
        let table = api::assemble(&state, dataset).await;
        info!(dataset = %dataset.name(), rows = table.len(), "Pipeline complete");
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    // Establish the upstream session up front; a failure here is not fatal,
    // the client re-logs in on the first request
    if let Err(e) = state.client.login().await {
        warn!(error = %e, "Initial upstream login failed, will retry per request");
    }

    server::run(
        state.clone(),
        &config.daemon.bind,
        config.daemon.tls.as_ref(),
    )
    .await
}
