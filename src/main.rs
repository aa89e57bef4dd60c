//! Online server count daemon.
//!
//! ```text
//!   servers.toml ──▶ StaticRegistry ──┐
//!                                     ▼
//!   config.properties ──▶ ServerMonitor ──▶ probe tasks ──▶ backends
//!                              │
//!                              ▼
//!                       status API (/status) ──▶ consumers
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use online_server_count::config::load_config;
use online_server_count::lifecycle::{signals::wait_for_shutdown_signal, Shutdown};
use online_server_count::observability::{logging, metrics};
use online_server_count::registry::load_registry;
use online_server_count::{status, ServerMonitor};

#[derive(Parser)]
#[command(name = "online-server-count")]
#[command(about = "Tracks which backend servers are online and serves the count", long_about = None)]
struct Cli {
    /// Directory holding config.properties (created if missing).
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// TOML file listing the servers to probe.
    #[arg(short, long, default_value = "servers.toml")]
    servers: PathBuf,

    /// Address for the status API.
    #[arg(long, default_value = "127.0.0.1:8090")]
    status_address: SocketAddr,

    /// Address for the Prometheus exporter; disabled when omitted.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&logging::default_directive(&cli.log_level));

    tracing::info!("online-server-count v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.data_dir);
    let registry = Arc::new(load_registry(&cli.servers)?);

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr);
    }

    let monitor = Arc::new(ServerMonitor::new(config, registry));
    monitor.start()?;

    let shutdown = Shutdown::new();
    let listener = TcpListener::bind(cli.status_address).await?;
    let api = tokio::spawn(status::serve(listener, monitor.clone(), shutdown.subscribe()));

    wait_for_shutdown_signal().await;

    tracing::info!("Shutting down");
    monitor.stop();
    shutdown.trigger();
    api.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
