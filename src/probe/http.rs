//! HTTP health-endpoint probe.

use axum::body::Body;
use axum::http::Request;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::probe::{Probe, ProbeError};

const USER_AGENT: &str = concat!("online-server-count/", env!("CARGO_PKG_VERSION"));

/// Considers a server alive when `GET http://{address}{path}` returns 2xx.
#[derive(Clone)]
pub struct HttpProbe {
    uri: String,
    client: Client<HttpConnector, Body>,
}

impl HttpProbe {
    pub fn new(address: &str, path: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self::with_client(address, path, client)
    }

    /// Build a probe sharing an existing connection pool.
    pub fn with_client(address: &str, path: &str, client: Client<HttpConnector, Body>) -> Self {
        Self {
            uri: format!("http://{}{}", address, path),
            client,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Debug for HttpProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProbe").field("uri", &self.uri).finish()
    }
}

impl Probe for HttpProbe {
    fn probe(&self) -> BoxFuture<'_, Result<(), ProbeError>> {
        async move {
            let request = Request::builder()
                .method("GET")
                .uri(self.uri.as_str())
                .header("user-agent", USER_AGENT)
                .body(Body::empty())
                .map_err(|e| ProbeError::Request(e.to_string()))?;

            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ProbeError::Request(e.to_string()))?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(ProbeError::Status(response.status().as_u16()))
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status_line
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr.to_string()
    }

    #[tokio::test]
    async fn test_http_probe_success() {
        let addr = serve_once("200 OK").await;
        let probe = HttpProbe::new(&addr, "/health");
        assert!(probe.probe().await.is_ok());
    }

    #[tokio::test]
    async fn test_http_probe_non_success_status() {
        let addr = serve_once("503 Service Unavailable").await;
        let probe = HttpProbe::new(&addr, "/health");
        assert!(matches!(probe.probe().await, Err(ProbeError::Status(503))));
    }

    #[tokio::test]
    async fn test_uri_building() {
        let probe = HttpProbe::new("10.0.0.1:8080", "/healthz");
        assert_eq!(probe.uri(), "http://10.0.0.1:8080/healthz");
    }
}
