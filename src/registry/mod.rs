//! Server enumeration.
//!
//! # Data Flow
//! ```text
//! host (servers.toml, plugin API, ...)
//!     → ServerRegistry::list_servers()   (read fresh every cycle/query)
//!     → probe scheduler (one probe per non-ignored server)
//!     → status evaluator (online/total counts)
//! ```
//!
//! # Design Decisions
//! - The monitor never caches the server list; it may change between cycles
//! - Each entry carries its own probe, so mixed probe kinds are fine
//! - Enumeration can fail; callers isolate the failure

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::probe::Probe;

pub mod file;

pub use file::load_registry;

/// A server as seen by the monitor: its name and how to probe it.
#[derive(Clone)]
pub struct RegisteredServer {
    pub id: String,
    pub probe: Arc<dyn Probe>,
}

impl RegisteredServer {
    pub fn new(id: impl Into<String>, probe: Arc<dyn Probe>) -> Self {
        Self {
            id: id.into(),
            probe,
        }
    }
}

impl std::fmt::Debug for RegisteredServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredServer").field("id", &self.id).finish()
    }
}

/// Error type for server enumeration.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate server name {0:?}")]
    Duplicate(String),

    #[error("server {name:?}: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("server list unavailable: {0}")]
    Unavailable(String),
}

/// Source of the current server set.
pub trait ServerRegistry: Send + Sync {
    fn list_servers(&self) -> Result<Vec<RegisteredServer>, RegistryError>;
}

/// In-memory registry that hosts can mutate at runtime.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    servers: RwLock<Vec<RegisteredServer>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server, replacing any existing entry with the same name.
    pub fn register(&self, id: impl Into<String>, probe: Arc<dyn Probe>) {
        let server = RegisteredServer::new(id, probe);
        let mut servers = self.servers.write().unwrap_or_else(PoisonError::into_inner);
        match servers.iter_mut().find(|s| s.id == server.id) {
            Some(existing) => *existing = server,
            None => servers.push(server),
        }
    }

    /// Remove a server. Returns whether it was present.
    pub fn unregister(&self, id: &str) -> bool {
        let mut servers = self.servers.write().unwrap_or_else(PoisonError::into_inner);
        let before = servers.len();
        servers.retain(|s| s.id != id);
        servers.len() != before
    }

    pub fn len(&self) -> usize {
        self.servers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ServerRegistry for StaticRegistry {
    fn list_servers(&self) -> Result<Vec<RegisteredServer>, RegistryError> {
        let servers = self
            .servers
            .read()
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;
        Ok(servers.clone())
    }
}
