//! Nexus gateway binary.
//!
//! - Loads `nexus.yaml` (or the path given as the first argument)
//! - Starts every configured metrics feed
//! - Serves snapshots over HTTP (`/v1/feeds/:id`) and WebSocket (`/v1/feeds/:id/ws`)
//! - Stops feeds and simulations on Ctrl-C

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use nexus_core::error::{NexusError, Result};
use nexus_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "nexus-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "nexus.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| NexusError::BadRequest(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, feeds = ?state.feeds().ids(), "nexus-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| NexusError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| NexusError::Internal(format!("server failed: {e}")))?;

    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    state.shutdown();
}
