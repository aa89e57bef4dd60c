//! Liveness tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probing (active.rs):
//!     Periodic timer
//!     → list servers, skip ignored
//!     → one probe task per server (3s timeout)
//!     → success: store.rs records cycle start time
//!
//! Status (status.rs):
//!     Query (any time)
//!     → one server snapshot + one `now`
//!     → online = last success no older than offline timeout
//!     → ServerCounts { online, total }
//! ```
//!
//! # Design Decisions
//! - Offline is derived from staleness; failures write nothing
//! - Last completing probe wins for a server
//! - Store, scheduler and evaluator share one `Arc<LivenessStore>` owned by
//!   the monitor (monitor.rs)

pub mod active;
pub mod monitor;
pub mod status;
pub mod store;

pub use active::{ProbeScheduler, SchedulerError, PROBE_TIMEOUT};
pub use monitor::ServerMonitor;
pub use status::{ServerCounts, ServerStatus, StatusEvaluator};
pub use store::LivenessStore;
