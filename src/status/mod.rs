//! Status HTTP API.
//!
//! # Endpoints
//! - `GET /status`: `{"online": n, "total": m}`
//! - `GET /status/servers`: per-server detail
//! - `GET /health`: liveness of this process
//!
//! The API only reads from the monitor; it never triggers probes.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::health::ServerMonitor;
use crate::lifecycle::ShutdownSignal;
use self::handlers::*;

pub use self::handlers::StatusState;

pub fn setup_status_router(monitor: Arc<ServerMonitor>) -> Router {
    Router::new()
        .route("/status", get(get_counts))
        .route("/status/servers", get(get_servers))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(StatusState { monitor })
}

/// Serve the status API until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    monitor: Arc<ServerMonitor>,
    mut shutdown: ShutdownSignal,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Status API listening");

    axum::serve(listener, setup_status_router(monitor))
        .with_graceful_shutdown(async move {
            shutdown.triggered().await;
            tracing::info!("Status API received shutdown signal");
        })
        .await
}
