//! One-shot HTTP stub for exercising the real clients against localhost.

use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<String>,
}

impl StubServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self) -> String {
        format!("{}/homework_statuses/", self.base_url())
    }

    /// The request head the stub received.
    pub async fn request(self) -> String {
        self.handle.await.unwrap()
    }
}

/// Accepts a single connection and answers it with `status` and `body`.
pub async fn serve_once(status: &'static str, body: &'static str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        // Read the head, then drain the body so closing doesn't reset the client.
        let mut expected = None;
        loop {
            if expected.is_none() {
                if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    expected = Some(end + 4 + content_length(&received[..end]));
                }
            }
            if matches!(expected, Some(total) if received.len() >= total) {
                break;
            }
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&received).into_owned()
    });

    StubServer { addr, handle }
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
