//! Shared mock backends for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Start a backend that accepts connections and answers any request with
/// `200 OK`. Aborting the handle closes the listener.
#[allow(dead_code)]
pub async fn start_mock_backend() -> (SocketAddr, JoinHandle<()>) {
    start_programmable_backend(|| async { 200 }).await
}

/// Start an HTTP backend whose status code comes from `f` on every request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, JoinHandle<()>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = u16> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    let handle = tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let status_text = match f().await {
                    200 => "200 OK",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "404 Not Found",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    status_text
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, handle)
}

/// Start a backend that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (addr, handle)
}

/// Give background probe tasks a moment to run.
#[allow(dead_code)]
pub async fn settle(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
