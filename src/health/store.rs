//! Last-success timestamps per server.

use dashmap::DashMap;
use tokio::time::Instant;

/// Thread-safe map of server name to the start of the cycle in which it last
/// answered a probe.
///
/// Writes are unconditional: whichever probe completes last wins, even if it
/// was started earlier than one that completed before it. Entries are never
/// removed; a server without an entry has never been reached.
#[derive(Debug, Default)]
pub struct LivenessStore {
    inner: DashMap<String, Instant>,
}

impl LivenessStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful probe for `server` at `at`, replacing any previous
    /// value.
    pub fn record_success(&self, server: &str, at: Instant) {
        self.inner.insert(server.to_string(), at);
    }

    /// Time of the last successful probe, if there ever was one.
    pub fn get_last_success(&self, server: &str) -> Option<Instant> {
        self.inner.get(server).map(|r| *r.value())
    }

    /// Number of servers that have succeeded at least once.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
