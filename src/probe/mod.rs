//! Probe operations.
//!
//! A probe is one liveness check against one server. The monitor never does
//! network I/O itself; it calls whatever [`Probe`] the registry hands it and
//! bounds the call with its own timeout.
//!
//! # Implementations
//! - `tcp.rs`: success iff a TCP connection can be opened
//! - `http.rs`: success iff `GET <path>` answers 2xx

use std::io;

use futures_util::future::BoxFuture;
use thiserror::Error;

pub mod http;
pub mod tcp;

pub use http::HttpProbe;
pub use tcp::TcpProbe;

/// Why a probe did not succeed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(#[from] io::Error),

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("no response within {0:?}")]
    Timeout(std::time::Duration),
}

/// A single asynchronous liveness check.
pub trait Probe: Send + Sync {
    /// Run the check once. `Ok(())` means the server answered.
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>>;
}
