use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::JsonFetcher;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`JsonFetcher`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpJsonClient {
    client: Client,
}

impl HttpJsonClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinbridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for HttpJsonClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonClient {
    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> Option<Value> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("Request to {} returned status {}", url, status);
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("Failed to parse JSON from {}: {}", url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request on a local port with a canned response.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\
                 connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/ticker", addr)
    }

    fn client() -> HttpJsonClient {
        HttpJsonClient::with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_json_body_is_returned() {
        let url = serve_once("200 OK", r#"{"price":"50000.1"}"#).await;
        let body = client().fetch_json(&url, &[], &[]).await.unwrap();
        assert_eq!(body["price"], "50000.1");
    }

    #[tokio::test]
    async fn test_server_error_is_absent() {
        let url = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
        assert!(client().fetch_json(&url, &[], &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_non_json_body_is_absent() {
        let url = serve_once("200 OK", "<html>maintenance</html>").await;
        assert!(client().fetch_json(&url, &[], &[]).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_absent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/ticker", addr);
        assert!(client().fetch_json(&url, &[], &[]).await.is_none());
    }
}
