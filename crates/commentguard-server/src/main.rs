//! CommentGuard Server
//!
//! Long-running HTTP API for toxicity scoring. Loads the trained model
//! pair once at startup (or falls back to the demo heuristic) and serves
//! single and batch predictions over a shared, read-only scorer.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

use commentguard_server::{AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting CommentGuard server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Initialize application state: the model pair is loaded exactly once
    // here, before any request can race the load, and is immutable after.
    let state = AppState::new(&config, metrics_handle)?;
    if state.scorer.demo_mode() {
        info!("running in demo mode; train a model with commentguard-trainer");
    }

    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let app = commentguard_server::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "commentguard_requests_total",
        "Total number of requests processed by endpoint"
    );
    metrics::describe_histogram!(
        "commentguard_scoring_latency_us",
        metrics::Unit::Microseconds,
        "Scoring latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
