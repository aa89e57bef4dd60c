//! Online/offline classification.
//!
//! A server is online iff it is not ignored, has succeeded at least once, and
//! its last success is no older than the offline timeout. Equality counts as
//! online. Nothing here blocks or mutates.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::config::IgnoreSet;
use crate::health::store::LivenessStore;

/// Online and total server counts taken from one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServerCounts {
    pub online: usize,
    pub total: usize,
}

/// Per-server view for detailed status output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerStatus {
    pub name: String,
    pub online: bool,
    /// Seconds since the last success, `None` if never reached.
    pub last_success_secs_ago: Option<f64>,
}

/// Evaluates server liveness against a shared store.
#[derive(Debug, Clone)]
pub struct StatusEvaluator {
    store: Arc<LivenessStore>,
    ignore: Arc<IgnoreSet>,
}

impl StatusEvaluator {
    pub fn new(store: Arc<LivenessStore>, ignore: Arc<IgnoreSet>) -> Self {
        Self { store, ignore }
    }

    pub fn is_online(&self, server: &str, now: Instant, offline_timeout: Duration) -> bool {
        if self.ignore.contains(server) {
            return false;
        }
        is_fresh(self.store.get_last_success(server), now, offline_timeout)
    }

    pub fn online_count<S: AsRef<str>>(
        &self,
        servers: &[S],
        now: Instant,
        offline_timeout: Duration,
    ) -> usize {
        self.tracked(servers)
            .filter(|server| self.is_online(server, now, offline_timeout))
            .count()
    }

    pub fn total_count<S: AsRef<str>>(&self, servers: &[S]) -> usize {
        self.tracked(servers).count()
    }

    /// Both counts over the same server list and the same `now`.
    pub fn counts<S: AsRef<str>>(
        &self,
        servers: &[S],
        now: Instant,
        offline_timeout: Duration,
    ) -> ServerCounts {
        ServerCounts {
            online: self.online_count(servers, now, offline_timeout),
            total: self.total_count(servers),
        }
    }

    /// Per-server status for every non-ignored server, in input order.
    pub fn statuses<S: AsRef<str>>(
        &self,
        servers: &[S],
        now: Instant,
        offline_timeout: Duration,
    ) -> Vec<ServerStatus> {
        self.tracked(servers)
            .map(|server| {
                let last = self.store.get_last_success(server);
                ServerStatus {
                    name: server.to_string(),
                    online: is_fresh(last, now, offline_timeout),
                    last_success_secs_ago: last
                        .map(|last| now.saturating_duration_since(last).as_secs_f64()),
                }
            })
            .collect()
    }

    fn tracked<'a, S: AsRef<str>>(&'a self, servers: &'a [S]) -> impl Iterator<Item = &'a str> {
        servers
            .iter()
            .map(AsRef::as_ref)
            .filter(|server| !self.ignore.contains(server))
    }
}

// A success recorded after `now` was captured counts as fresh.
fn is_fresh(last: Option<Instant>, now: Instant, offline_timeout: Duration) -> bool {
    last.is_some_and(|last| now.saturating_duration_since(last) <= offline_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn evaluator(ignore: &[&str]) -> (Arc<LivenessStore>, StatusEvaluator) {
        let store = Arc::new(LivenessStore::new());
        let ignore = Arc::new(ignore.iter().copied().collect::<IgnoreSet>());
        (store.clone(), StatusEvaluator::new(store, ignore))
    }

    #[test]
    fn test_never_probed_is_offline() {
        let (_, eval) = evaluator(&[]);
        let t0 = Instant::now();
        for secs in [0, 1, 10, 3600] {
            assert!(!eval.is_online("survival", t0 + Duration::from_secs(secs), TIMEOUT));
        }
    }

    #[test]
    fn test_staleness_boundary() {
        let (store, eval) = evaluator(&[]);
        let t0 = Instant::now();
        store.record_success("lobby", t0);

        assert!(eval.is_online("lobby", t0, TIMEOUT));
        assert!(eval.is_online("lobby", t0 + Duration::from_secs(10), TIMEOUT));
        assert!(!eval.is_online("lobby", t0 + Duration::from_millis(10_001), TIMEOUT));
    }

    #[test]
    fn test_success_after_now_counts_as_fresh() {
        let (store, eval) = evaluator(&[]);
        let now = Instant::now();
        store.record_success("lobby", now + Duration::from_secs(1));
        assert!(eval.is_online("lobby", now, TIMEOUT));
    }

    #[test]
    fn test_zero_timeout_only_exact_instant() {
        let (store, eval) = evaluator(&[]);
        let t0 = Instant::now();
        store.record_success("lobby", t0);

        assert!(eval.is_online("lobby", t0, Duration::ZERO));
        assert!(!eval.is_online("lobby", t0 + Duration::from_millis(1), Duration::ZERO));
    }

    #[test]
    fn test_lobby_and_survival_scenario() {
        let (store, eval) = evaluator(&[]);
        let servers = ["lobby", "survival"];
        let t0 = Instant::now();
        store.record_success("lobby", t0);

        let at_5 = t0 + Duration::from_secs(5);
        let at_15 = t0 + Duration::from_secs(15);

        assert!(eval.is_online("lobby", at_5, TIMEOUT));
        assert!(!eval.is_online("lobby", at_15, TIMEOUT));
        assert!(!eval.is_online("survival", at_5, TIMEOUT));
        assert_eq!(eval.total_count(&servers), 2);
        assert_eq!(eval.online_count(&servers, at_5, TIMEOUT), 1);
        assert_eq!(eval.online_count(&servers, at_15, TIMEOUT), 0);
    }

    #[test]
    fn test_ignored_server_excluded_from_both_counts() {
        let (store, eval) = evaluator(&["maintenance"]);
        let servers = ["lobby", "maintenance"];
        let t0 = Instant::now();
        store.record_success("lobby", t0);
        store.record_success("maintenance", t0);

        assert!(!eval.is_online("maintenance", t0, TIMEOUT));
        assert_eq!(
            eval.counts(&servers, t0, TIMEOUT),
            ServerCounts { online: 1, total: 1 }
        );
    }

    #[test]
    fn test_online_never_exceeds_total() {
        let (store, eval) = evaluator(&["b", "d"]);
        let t0 = Instant::now();
        let all = ["a", "b", "c", "d", "e"];
        for name in &all {
            store.record_success(name, t0);
        }

        for len in 0..=all.len() {
            let subset = &all[..len];
            let counts = eval.counts(subset, t0, TIMEOUT);
            assert!(counts.online <= counts.total);
            assert_eq!(counts.online, counts.total);
        }
    }

    #[test]
    fn test_statuses() {
        let (store, eval) = evaluator(&["maintenance"]);
        let t0 = Instant::now();
        store.record_success("lobby", t0);

        let statuses = eval.statuses(
            &["lobby", "survival", "maintenance"],
            t0 + Duration::from_secs(2),
            TIMEOUT,
        );

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].name, "lobby");
        assert!(statuses[0].online);
        assert_eq!(statuses[0].last_success_secs_ago, Some(2.0));
        assert_eq!(statuses[1].name, "survival");
        assert!(!statuses[1].online);
        assert_eq!(statuses[1].last_success_secs_ago, None);
    }

    #[test]
    fn test_status_online_flag_matches_reported_age() {
        let (store, eval) = evaluator(&[]);
        let t0 = Instant::now();
        let now = t0 + Duration::from_secs(20);
        store.record_success("fresh", now - Duration::from_secs(3));
        store.record_success("edge", now - TIMEOUT);
        store.record_success("stale", now - Duration::from_secs(11));
        store.record_success("ahead", now + Duration::from_secs(1));

        let statuses = eval.statuses(&["fresh", "edge", "stale", "ahead", "never"], now, TIMEOUT);

        for status in &statuses {
            let within = status
                .last_success_secs_ago
                .is_some_and(|age| age <= TIMEOUT.as_secs_f64());
            assert_eq!(status.online, within, "{}", status.name);
        }
        let online: Vec<_> = statuses.iter().filter(|s| s.online).map(|s| s.name.as_str()).collect();
        assert_eq!(online, vec!["fresh", "edge", "ahead"]);
    }
}
