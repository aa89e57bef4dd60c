//! TCP connect probe.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::net::TcpStream;

use crate::probe::{Probe, ProbeError};

/// Considers a server alive when a TCP handshake to its address completes.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
}

impl TcpProbe {
    /// `address` is anything `TcpStream::connect` accepts, e.g. `"10.0.0.5:25565"`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Probe for TcpProbe {
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        async move {
            let stream = TcpStream::connect(&self.address).await?;
            drop(stream);
            Ok(())
        }
        .boxed()
    }
}
