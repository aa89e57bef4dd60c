//! The liveness monitor: one store, one scheduler, one evaluator.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::MonitorConfig;
use crate::health::active::{ProbeScheduler, SchedulerError};
use crate::health::status::{ServerCounts, ServerStatus, StatusEvaluator};
use crate::health::store::LivenessStore;
use crate::registry::ServerRegistry;

/// Tracks which of the registry's servers are reachable.
///
/// Hosts call [`start`](Self::start) during startup and
/// [`stop`](Self::stop) during shutdown. Status queries may happen at any
/// time, running or not.
pub struct ServerMonitor {
    config: MonitorConfig,
    registry: Arc<dyn ServerRegistry>,
    store: Arc<LivenessStore>,
    scheduler: ProbeScheduler,
    evaluator: StatusEvaluator,
}

impl ServerMonitor {
    pub fn new(config: MonitorConfig, registry: Arc<dyn ServerRegistry>) -> Self {
        let store = Arc::new(LivenessStore::new());
        let ignore = Arc::new(config.ignore_servers.clone());
        let scheduler = ProbeScheduler::new(
            registry.clone(),
            store.clone(),
            ignore.clone(),
            config.ping_interval(),
        );
        let evaluator = StatusEvaluator::new(store.clone(), ignore);

        Self {
            config,
            registry,
            store,
            scheduler,
            evaluator,
        }
    }

    /// Begin probing. Returns `Ok(false)` if already started.
    pub fn start(&self) -> Result<bool, SchedulerError> {
        self.scheduler.start()
    }

    /// Stop probing. Returns `false` if not running.
    pub fn stop(&self) -> bool {
        self.scheduler.stop()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Online and total counts from a single enumeration and a single `now`.
    ///
    /// If the registry cannot be read, both counts are zero.
    pub fn counts(&self) -> ServerCounts {
        let Some(ids) = self.server_ids() else {
            return ServerCounts::default();
        };
        self.evaluator
            .counts(&ids, Instant::now(), self.offline_timeout())
    }

    /// Prefer [`counts`](Self::counts) when displaying both numbers together.
    pub fn online_count(&self) -> usize {
        self.counts().online
    }

    pub fn total_count(&self) -> usize {
        let Some(ids) = self.server_ids() else {
            return 0;
        };
        self.evaluator.total_count(&ids)
    }

    /// Whether a single server is currently classified online.
    pub fn is_online(&self, server: &str) -> bool {
        self.evaluator
            .is_online(server, Instant::now(), self.offline_timeout())
    }

    /// Status of every counted server, in registry order.
    pub fn server_statuses(&self) -> Vec<ServerStatus> {
        let Some(ids) = self.server_ids() else {
            return Vec::new();
        };
        self.evaluator
            .statuses(&ids, Instant::now(), self.offline_timeout())
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<LivenessStore> {
        &self.store
    }

    fn offline_timeout(&self) -> Duration {
        self.config.offline_timeout()
    }

    fn server_ids(&self) -> Option<Vec<String>> {
        match self.registry.list_servers() {
            Ok(servers) => Some(servers.into_iter().map(|s| s.id).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to enumerate servers for status query");
                None
            }
        }
    }
}
