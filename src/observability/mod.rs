//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler, config loader, status API:
//!     → tracing events (logging.rs installs the subscriber)
//!     → metrics facade (metrics.rs installs the Prometheus exporter)
//! ```
//!
//! # Design Decisions
//! - Probe failures are `debug`, config problems `error`, lifecycle `info`
//! - Metrics are recorded unconditionally; without an exporter they are no-ops

pub mod logging;
pub mod metrics;
