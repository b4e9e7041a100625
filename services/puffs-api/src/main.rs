//! PuffsIndex API Server
//!
//! Serves live AQI readings, cigarette equivalents and place pages.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use puffs_common::RenderMode;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use puffs_api::config::ServiceConfig;
use puffs_api::prewarm::PageWarmer;
use puffs_api::routes::build_router;
use puffs_api::state::AppState;

/// PuffsIndex API Server
#[derive(Parser, Debug)]
#[command(name = "puffs-api")]
#[command(about = "Air quality expressed as cigarettes smoked per day")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "PUFFS_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "PUFFS_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting PuffsIndex API server");

    let config = ServiceConfig::from_env()?;
    info!(
        render_mode = %config.render_mode,
        revalidate_secs = config.revalidate.as_secs(),
        "Configuration loaded"
    );

    let state = Arc::new(AppState::new(config).context("Failed to initialize application state")?);

    if state.config.render_mode == RenderMode::Static {
        let warmer = PageWarmer::from_config(Arc::clone(&state));
        tokio::spawn(async move {
            warmer.warm_startup().await;
        });
    }

    let app = build_router(Arc::clone(&state), Some(prometheus_handle));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("PuffsIndex API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
