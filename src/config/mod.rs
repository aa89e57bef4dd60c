//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! <data_dir>/config.properties (key=value)
//!     → loader.rs (materialise default file, parse keys)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (immutable for the process lifetime)
//!
//! servers.toml
//!     → registry::file (host-side server list)
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup, never hot-reloaded
//! - Every key has a default; bad values fall back per key
//! - Loading never fails; problems are logged

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::IgnoreSet;
pub use schema::MonitorConfig;
