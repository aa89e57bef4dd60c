//! Online server count: periodic liveness tracking for a set of named
//! backend servers, reduced to an online/total pair.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod registry;
pub mod status;

pub use config::MonitorConfig;
pub use health::{ServerCounts, ServerMonitor};
pub use lifecycle::Shutdown;
pub use registry::{RegisteredServer, ServerRegistry, StaticRegistry};
