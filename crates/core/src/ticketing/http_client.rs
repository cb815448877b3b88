//! HTTP ticketing client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{parse_count, TicketingClient, TicketingError};
use crate::config::TicketingConfig;
use crate::discovery::ServiceEndpoint;

/// Ticketing client speaking plain HTTP to the discovered endpoint.
pub struct HttpTicketingClient {
    client: Client,
    path: String,
}

impl HttpTicketingClient {
    /// Create a new ticketing client.
    pub fn new(config: &TicketingConfig) -> Result<Self, TicketingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            path: config.path.clone(),
        })
    }
}

#[async_trait]
impl TicketingClient for HttpTicketingClient {
    async fn available_tickets(&self, endpoint: &ServiceEndpoint) -> Result<i64, TicketingError> {
        let url = endpoint.url(&self.path);
        debug!("Ticketing request: GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TicketingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_count(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one HTTP response and hand back the request line.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let request = String::from_utf8_lossy(&request).to_string();
            request.lines().next().unwrap_or_default().to_string()
        });

        (addr.to_string(), handle)
    }

    fn client() -> HttpTicketingClient {
        HttpTicketingClient::new(&TicketingConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_reads_integer_count() {
        let (addr, server) = serve_once("200 OK", "42").await;

        let count = client()
            .available_tickets(&ServiceEndpoint::new(addr))
            .await
            .unwrap();
        assert_eq!(count, 42);

        let request_line = server.await.unwrap();
        assert_eq!(request_line, "GET /tickets HTTP/1.1");
    }

    #[tokio::test]
    async fn test_uses_configured_path() {
        let (addr, server) = serve_once("200 OK", "3").await;
        let config = TicketingConfig {
            path: "/api/v2/tickets".to_string(),
            ..Default::default()
        };

        let client = HttpTicketingClient::new(&config).unwrap();
        assert_eq!(
            client
                .available_tickets(&ServiceEndpoint::new(addr))
                .await
                .unwrap(),
            3
        );
        assert_eq!(server.await.unwrap(), "GET /api/v2/tickets HTTP/1.1");
    }

    #[tokio::test]
    async fn test_non_integer_body() {
        let (addr, _server) = serve_once("200 OK", "plenty").await;

        let result = client().available_tickets(&ServiceEndpoint::new(addr)).await;
        assert!(matches!(result, Err(TicketingError::InvalidCount(body)) if body == "plenty"));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (addr, _server) = serve_once("500 Internal Server Error", "boom").await;

        let result = client().available_tickets(&ServiceEndpoint::new(addr)).await;
        assert!(matches!(
            result,
            Err(TicketingError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Bind then drop to get a port nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let result = client()
            .available_tickets(&ServiceEndpoint::new(addr.to_string()))
            .await;
        assert!(matches!(result, Err(TicketingError::Http(_))));
    }
}
