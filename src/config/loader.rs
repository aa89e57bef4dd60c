//! Configuration loading from disk.
//!
//! The monitor reads a plain `key=value` file from its data directory. A
//! missing file is materialised from [`DEFAULT_CONFIG_FILE`]. Nothing here is
//! fatal: every failure falls back to defaults (per key where possible) and
//! is logged.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{
    IgnoreSet, MonitorConfig, CONFIG_FILE_NAME, DEFAULT_CONFIG_FILE,
    DEFAULT_OFFLINE_TIMEOUT_SECS, DEFAULT_PING_INTERVAL_SECS,
};
use crate::config::validation::{validate_config, ValidationError};

const KEY_PING_INTERVAL: &str = "ping_interval_secs";
const KEY_OFFLINE_TIMEOUT: &str = "offline_timeout_secs";
const KEY_IGNORE_SERVERS: &str = "ignore_servers";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid value {value:?} for {key}: {source}")]
    InvalidNumber {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Make sure `data_dir/config.properties` exists, writing the default file
/// if it does not. Returns the path of the configuration file.
pub fn ensure_config_file(data_dir: &Path) -> Result<PathBuf, ConfigError> {
    fs::create_dir_all(data_dir).map_err(|source| ConfigError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let path = data_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG_FILE).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Created default config file");
    }

    Ok(path)
}

/// Load the monitor configuration from `data_dir`.
///
/// Always returns a usable configuration. I/O failures yield the defaults;
/// malformed values fall back to the default for that key only.
pub fn load_config(data_dir: &Path) -> MonitorConfig {
    let content = ensure_config_file(data_dir).and_then(|path| {
        fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })
    });

    let content = match content {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration, using defaults");
            return MonitorConfig::default();
        }
    };

    let (config, problems) = from_properties(&content);
    for problem in &problems {
        tracing::error!(error = %problem, "Invalid configuration value, using default");
    }

    if config.offline_timeout_secs < config.ping_interval_secs {
        tracing::warn!(
            ping_interval_secs = config.ping_interval_secs,
            offline_timeout_secs = config.offline_timeout_secs,
            "offline timeout is shorter than the ping interval; servers will flap offline between cycles"
        );
    }

    tracing::info!(
        ping_interval_secs = config.ping_interval_secs,
        offline_timeout_secs = config.offline_timeout_secs,
        ignore_servers = ?config.ignore_servers.sorted(),
        "Configuration loaded"
    );

    config
}

/// Build a configuration from properties text.
///
/// Returns the configuration together with every value that was rejected.
/// Rejected values are replaced by their defaults.
pub fn from_properties(content: &str) -> (MonitorConfig, Vec<ConfigError>) {
    let properties = parse_properties(content);
    let mut config = MonitorConfig::default();
    let mut problems = Vec::new();

    for key in properties.keys() {
        if !matches!(
            key.as_str(),
            KEY_PING_INTERVAL | KEY_OFFLINE_TIMEOUT | KEY_IGNORE_SERVERS
        ) {
            tracing::debug!(key = %key, "Ignoring unknown configuration key");
        }
    }

    if let Some(value) = properties.get(KEY_PING_INTERVAL) {
        match parse_secs(KEY_PING_INTERVAL, value) {
            Ok(secs) => config.ping_interval_secs = secs,
            Err(e) => problems.push(e),
        }
    }

    if let Some(value) = properties.get(KEY_OFFLINE_TIMEOUT) {
        match parse_secs(KEY_OFFLINE_TIMEOUT, value) {
            Ok(secs) => config.offline_timeout_secs = secs,
            Err(e) => problems.push(e),
        }
    }

    if let Some(value) = properties.get(KEY_IGNORE_SERVERS) {
        config.ignore_servers = IgnoreSet::parse(value);
    }

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            match error {
                ValidationError::ZeroPingInterval | ValidationError::PingIntervalTooLarge(_) => {
                    config.ping_interval_secs = DEFAULT_PING_INTERVAL_SECS;
                }
                ValidationError::OfflineTimeoutTooLarge(_) => {
                    config.offline_timeout_secs = DEFAULT_OFFLINE_TIMEOUT_SECS;
                }
            }
        }
        problems.push(ConfigError::Validation(errors));
    }

    (config, problems)
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse::<u64>()
        .map_err(|source| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
            source,
        })
}

/// Split properties text into key/value pairs.
///
/// Blank lines and lines starting with `#` or `!` are skipped. The first `=`
/// or `:` separates key from value; without one, the first whitespace does.
/// Later duplicates overwrite earlier ones.
fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = match line.find(['=', ':']) {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => line.split_once(char::is_whitespace).unwrap_or((line, "")),
        };

        properties.insert(key.trim().to_string(), value.trim().to_string());
    }

    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let (config, problems) = from_properties(
            "ping_interval_secs=3\noffline_timeout_secs=20\nignore_servers=maintenance, staging\n",
        );
        assert!(problems.is_empty());
        assert_eq!(config.ping_interval_secs, 3);
        assert_eq!(config.offline_timeout_secs, 20);
        assert!(config.ignore_servers.contains("maintenance"));
        assert!(config.ignore_servers.contains("staging"));
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let (config, problems) = from_properties(DEFAULT_CONFIG_FILE);
        assert!(problems.is_empty());
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_malformed_timeout_falls_back_to_default() {
        let (config, problems) =
            from_properties("ping_interval_secs=7\noffline_timeout_secs=abc\n");
        assert_eq!(config.ping_interval_secs, 7);
        assert_eq!(config.offline_timeout_secs, DEFAULT_OFFLINE_TIMEOUT_SECS);
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0],
            ConfigError::InvalidNumber { key: KEY_OFFLINE_TIMEOUT, .. }
        ));
    }

    #[test]
    fn test_negative_interval_rejected() {
        let (config, problems) = from_properties("ping_interval_secs=-5\n");
        assert_eq!(config.ping_interval_secs, DEFAULT_PING_INTERVAL_SECS);
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn test_zero_interval_reset_to_default() {
        let (config, problems) = from_properties("ping_interval_secs=0\n");
        assert_eq!(config.ping_interval_secs, DEFAULT_PING_INTERVAL_SECS);
        assert!(matches!(problems[0], ConfigError::Validation(_)));
    }

    #[test]
    fn test_oversized_values_reset_to_defaults() {
        let (config, problems) = from_properties(
            "ping_interval_secs=18446744073709551615\noffline_timeout_secs=2147483648\n",
        );
        assert_eq!(config.ping_interval_secs, DEFAULT_PING_INTERVAL_SECS);
        assert_eq!(config.offline_timeout_secs, DEFAULT_OFFLINE_TIMEOUT_SECS);
        assert!(matches!(
            &problems[..],
            [ConfigError::Validation(errors)] if errors.len() == 2
        ));
    }

    #[test]
    fn test_unknown_keys_and_comments_ignored() {
        let (config, problems) = from_properties(
            "# comment\n! also a comment\n\nmotd=hello\nping_interval_secs : 9\n",
        );
        assert!(problems.is_empty());
        assert_eq!(config.ping_interval_secs, 9);
        assert_eq!(config.offline_timeout_secs, DEFAULT_OFFLINE_TIMEOUT_SECS);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let (config, _) = from_properties("offline_timeout_secs=1\noffline_timeout_secs=2\n");
        assert_eq!(config.offline_timeout_secs, 2);
    }

    #[test]
    fn test_whitespace_separator() {
        let (config, problems) = from_properties("ping_interval_secs 4\n");
        assert!(problems.is_empty());
        assert_eq!(config.ping_interval_secs, 4);
    }

    #[test]
    fn test_missing_file_materialises_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("plugin-data");

        let config = load_config(&data_dir);

        assert_eq!(config, MonitorConfig::default());
        let written = fs::read_to_string(data_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(written, DEFAULT_CONFIG_FILE);
    }

    #[test]
    fn test_existing_file_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "offline_timeout_secs=abc\nignore_servers=maintenance\n").unwrap();

        let config = load_config(dir.path());

        assert_eq!(config.offline_timeout_secs, DEFAULT_OFFLINE_TIMEOUT_SECS);
        assert!(config.ignore_servers.contains("maintenance"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("offline_timeout_secs=abc"));
    }

    #[test]
    fn test_unreadable_data_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let config = load_config(&blocker);

        assert_eq!(config, MonitorConfig::default());
    }
}
