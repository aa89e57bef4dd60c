//! Configuration schema definitions.
//!
//! The monitor configuration is read once at startup and shared immutably.
//! Durations are stored as whole seconds, matching the on-disk keys.

use std::collections::HashSet;
use std::time::Duration;

/// Default probe cycle period in seconds.
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 5;

/// Default staleness threshold in seconds.
pub const DEFAULT_OFFLINE_TIMEOUT_SECS: u64 = 10;

/// Largest accepted value for either duration key.
pub const MAX_CONFIG_SECS: u64 = i32::MAX as u64;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.properties";

/// Contents written when no configuration file exists yet.
pub const DEFAULT_CONFIG_FILE: &str = "\
# Seconds between probe cycles.
ping_interval_secs=5

# A server whose last successful probe is older than this is offline.
offline_timeout_secs=10

# Comma-separated server names that are never probed or counted.
ignore_servers=
";

/// Root configuration for the liveness monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Seconds between probe cycles.
    pub ping_interval_secs: u64,

    /// Maximum age in seconds of a last success for a server to be online.
    pub offline_timeout_secs: u64,

    /// Servers excluded from probing and from all counts.
    pub ignore_servers: IgnoreSet,
}

impl MonitorConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn offline_timeout(&self) -> Duration {
        Duration::from_secs(self.offline_timeout_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            offline_timeout_secs: DEFAULT_OFFLINE_TIMEOUT_SECS,
            ignore_servers: IgnoreSet::default(),
        }
    }
}

/// Server names that are never probed and never counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// Parse a comma-separated list, trimming each entry and dropping blanks.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order, for stable log output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
