//! Server list loaded from a TOML file.
//!
//! ```toml
//! [[servers]]
//! name = "lobby"
//! address = "10.0.0.5:25565"
//!
//! [[servers]]
//! name = "api"
//! address = "10.0.0.6:8080"
//! probe = "http"
//! path = "/healthz"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::{Deserialize, Serialize};

use crate::probe::{HttpProbe, Probe, TcpProbe};
use crate::registry::{RegistryError, StaticRegistry};

/// Root of `servers.toml`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServersFile {
    pub servers: Vec<ServerConfig>,
}

/// One backend server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Unique server name; this is the identifier used everywhere else.
    pub name: String,

    /// `host:port` to probe.
    pub address: String,

    /// How to probe the server.
    #[serde(default)]
    pub probe: ProbeKind,

    /// Request path for HTTP probes.
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    "/health".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    #[default]
    Tcp,
    Http,
}

/// Parse `servers.toml` content.
pub fn parse_servers(content: &str) -> Result<ServersFile, RegistryError> {
    let file: ServersFile = toml::from_str(content)?;

    let mut seen = HashSet::new();
    for server in &file.servers {
        if server.name.trim().is_empty() {
            return Err(RegistryError::InvalidEntry {
                name: server.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if server.address.trim().is_empty() {
            return Err(RegistryError::InvalidEntry {
                name: server.name.clone(),
                reason: "address must not be empty".to_string(),
            });
        }
        if !seen.insert(server.name.as_str()) {
            return Err(RegistryError::Duplicate(server.name.clone()));
        }
    }

    Ok(file)
}

/// Build a registry from parsed server definitions. HTTP probes share one
/// connection pool.
pub fn build_registry(file: &ServersFile) -> StaticRegistry {
    let registry = StaticRegistry::new();
    let client: Client<HttpConnector, Body> =
        Client::builder(TokioExecutor::new()).build(HttpConnector::new());

    for server in &file.servers {
        let probe: Arc<dyn Probe> = match server.probe {
            ProbeKind::Tcp => Arc::new(TcpProbe::new(server.address.as_str())),
            ProbeKind::Http => Arc::new(HttpProbe::with_client(
                &server.address,
                &server.path,
                client.clone(),
            )),
        };
        registry.register(server.name.as_str(), probe);
    }

    registry
}

/// Load and validate a server list from a TOML file.
pub fn load_registry(path: &Path) -> Result<StaticRegistry, RegistryError> {
    let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = parse_servers(&content)?;

    tracing::info!(
        path = %path.display(),
        servers = file.servers.len(),
        "Server list loaded"
    );

    Ok(build_registry(&file))
}
