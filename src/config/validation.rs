//! Configuration validation.
//!
//! Parsing handles the syntax of each key; this module checks the values
//! make sense together. Returns every problem found, not just the first.

use thiserror::Error;

use crate::config::schema::{MonitorConfig, MAX_CONFIG_SECS};

/// A semantic problem with an otherwise parseable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ping_interval_secs must be greater than zero")]
    ZeroPingInterval,

    #[error("ping_interval_secs must be at most {max}, got {0}", max = MAX_CONFIG_SECS)]
    PingIntervalTooLarge(u64),

    #[error("offline_timeout_secs must be at most {max}, got {0}", max = MAX_CONFIG_SECS)]
    OfflineTimeoutTooLarge(u64),
}

/// Validate a parsed configuration.
///
/// An `offline_timeout_secs` of zero is accepted: it only means a server is
/// online at the exact instant of its last success.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.ping_interval_secs == 0 {
        errors.push(ValidationError::ZeroPingInterval);
    }
    if config.ping_interval_secs > MAX_CONFIG_SECS {
        errors.push(ValidationError::PingIntervalTooLarge(config.ping_interval_secs));
    }
    if config.offline_timeout_secs > MAX_CONFIG_SECS {
        errors.push(ValidationError::OfflineTimeoutTooLarge(
            config.offline_timeout_secs,
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
