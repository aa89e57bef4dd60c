//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     load config → load server list → monitor.start() → status API
//!
//! Shutdown (signals.rs → shutdown.rs):
//!     SIGTERM/SIGINT → monitor.stop() → Shutdown::trigger() → API drains
//! ```
//!
//! # Design Decisions
//! - The monitor stops before the API so no new cycles start during drain
//! - In-flight probes are not awaited on shutdown

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
