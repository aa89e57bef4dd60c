use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::health::{ServerCounts, ServerMonitor, ServerStatus};
use crate::observability::metrics;

/// Shared state for the status API.
#[derive(Clone)]
pub struct StatusState {
    pub monitor: Arc<ServerMonitor>,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub probing: bool,
}

pub async fn get_health(State(state): State<StatusState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        probing: state.monitor.is_running(),
    })
}

pub async fn get_counts(State(state): State<StatusState>) -> Json<ServerCounts> {
    let counts = state.monitor.counts();
    metrics::record_server_counts(counts);
    tracing::debug!(online = counts.online, total = counts.total, "Status query served");
    Json(counts)
}

pub async fn get_servers(State(state): State<StatusState>) -> Json<Vec<ServerStatus>> {
    Json(state.monitor.server_statuses())
}
