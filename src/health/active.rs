//! Active probing.
//!
//! # Responsibilities
//! - Fire a probe cycle every `ping_interval`, first one interval after start
//! - Dispatch one probe task per non-ignored server without waiting
//! - Record successes in the store, stamped with the cycle start time
//!
//! Probes are never cancelled by a new cycle or by `stop()`; a slow probe
//! may still be running when the next cycle starts for the same server.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::IgnoreSet;
use crate::health::store::LivenessStore;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::observability::metrics::{self, ProbeOutcome};
use crate::probe::ProbeError;
use crate::registry::{RegisteredServer, ServerRegistry};

/// Upper bound on a single probe. A probe still pending after this counts
/// as failed.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("probe scheduler must be started inside a Tokio runtime: {0}")]
    NoRuntime(#[from] TryCurrentError),

    #[error("ping interval must be greater than zero")]
    ZeroInterval,

    #[error("ping interval of {0:?} is too large to schedule")]
    IntervalOverflow(Duration),
}

/// Periodic driver for probe cycles.
pub struct ProbeScheduler {
    cycle: Arc<ProbeCycle>,
    interval: Duration,
    running: Mutex<Option<Shutdown>>,
}

impl ProbeScheduler {
    pub fn new(
        registry: Arc<dyn ServerRegistry>,
        store: Arc<LivenessStore>,
        ignore: Arc<IgnoreSet>,
        interval: Duration,
    ) -> Self {
        Self {
            cycle: Arc::new(ProbeCycle {
                registry,
                store,
                ignore,
            }),
            interval,
            running: Mutex::new(None),
        }
    }

    /// Arm the repeating timer.
    ///
    /// Returns `Ok(false)` without doing anything if already running.
    pub fn start(&self) -> Result<bool, SchedulerError> {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.is_some() {
            tracing::debug!("Probe scheduler already running");
            return Ok(false);
        }
        if self.interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }

        let handle = Handle::try_current()?;
        let shutdown = Shutdown::new();
        let first_tick = Instant::now()
            .checked_add(self.interval)
            .ok_or(SchedulerError::IntervalOverflow(self.interval))?;
        handle.spawn(
            self.cycle
                .clone()
                .run(first_tick, self.interval, shutdown.subscribe()),
        );
        *running = Some(shutdown);

        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            "Started server ping task"
        );
        Ok(true)
    }

    /// Cancel future cycles. In-flight probes are left to finish.
    ///
    /// Returns whether a timer was running.
    pub fn stop(&self) -> bool {
        let stopped = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match stopped {
            Some(shutdown) => {
                shutdown.trigger();
                tracing::info!("Stopped server ping task");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for ProbeScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything a cycle needs, shared between the timer task and the scheduler.
struct ProbeCycle {
    registry: Arc<dyn ServerRegistry>,
    store: Arc<LivenessStore>,
    ignore: Arc<IgnoreSet>,
}

impl ProbeCycle {
    async fn run(
        self: Arc<Self>,
        first_tick: Instant,
        period: Duration,
        mut shutdown: ShutdownSignal,
    ) {
        let mut ticker = time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.dispatch();
                }
                _ = shutdown.triggered() => {
                    tracing::debug!("Probe scheduler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Start one probe per eligible server and return immediately.
    fn dispatch(&self) {
        let cycle_start = Instant::now();

        let listed = panic::catch_unwind(AssertUnwindSafe(|| self.registry.list_servers()));
        let servers = match listed {
            Ok(Ok(servers)) => servers,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Failed to enumerate servers, skipping cycle");
                return;
            }
            Err(_) => {
                tracing::error!("Server enumeration panicked, skipping cycle");
                return;
            }
        };

        let mut probes = JoinSet::new();
        for server in servers {
            if self.ignore.contains(&server.id) {
                continue;
            }
            probes.spawn(probe_server(server, self.store.clone(), cycle_start));
        }

        let dispatched = probes.len();
        metrics::record_cycle(dispatched);
        tracing::trace!(dispatched, "Probe cycle dispatched");

        if !probes.is_empty() {
            tokio::spawn(reap(probes));
        }
    }
}

async fn probe_server(server: RegisteredServer, store: Arc<LivenessStore>, cycle_start: Instant) {
    let result = match time::timeout(PROBE_TIMEOUT, server.probe.probe()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(PROBE_TIMEOUT)),
    };

    match result {
        Ok(()) => {
            store.record_success(&server.id, cycle_start);
            metrics::record_probe(&server.id, ProbeOutcome::Success);
            metrics::record_store_size(store.len());
            tracing::debug!(server = %server.id, "Successfully pinged server");
        }
        Err(e) => {
            let outcome = match e {
                ProbeError::Timeout(_) => ProbeOutcome::Timeout,
                _ => ProbeOutcome::Failure,
            };
            metrics::record_probe(&server.id, outcome);
            tracing::debug!(server = %server.id, error = %e, "Failed to ping server");
        }
    }
}

/// Drain a cycle's probe tasks so panics are logged instead of lost.
async fn reap(mut probes: JoinSet<()>) {
    while let Some(joined) = probes.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                tracing::warn!(error = %e, "Probe task panicked");
            }
        }
    }
}
