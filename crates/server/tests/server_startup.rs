//! Process-level tests: run the `concerts` binary against a stub ticketing service.

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use axum::{routing::get, Router};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};
use tokio::process::{Child, Command};
use tokio::time::{sleep, timeout};

/// A running `concerts` process plus the files it depends on.
struct RunningServer {
    port: u16,
    client: Client,
    _child: Child,
    _config: NamedTempFile,
    _data: TempDir,
}

impl RunningServer {
    /// Start the binary with one static ticketing service registered.
    async fn start(ticketing: SocketAddr) -> Self {
        let port = free_port();
        let data = TempDir::new().unwrap();
        let config = write_config(&format!(
            r#"
[server]
host = "127.0.0.1"
port = {port}

[database]
path = "{db}"

[discovery]
backend = "static"
services = ["{ticketing}"]
"#,
            db = data.path().join("concerts.db").display(),
        ));

        let child = Command::new(env!("CARGO_BIN_EXE_concerts"))
            .env("CONCERTS_CONFIG", config.path())
            .env("RUST_LOG", "error")
            .kill_on_drop(true)
            .spawn()
            .expect("Failed to spawn server");

        let server = Self {
            port,
            client: Client::new(),
            _child: child,
            _config: config,
            _data: data,
        };
        server.wait_ready().await;
        server
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    async fn wait_ready(&self) {
        for _ in 0..100 {
            if self.client.get(self.url("/api/v1/health")).send().await.is_ok() {
                return;
            }
            sleep(Duration::from_millis(50)).await;
        }
        panic!("Server did not start in time");
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A ticketing service that always answers with `count`.
async fn ticketing_stub(count: i64) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/tickets", get(move || async move { count.to_string() }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// Run the binary to completion with the given config path.
async fn run_until_exit(config_path: &Path) -> Output {
    timeout(
        Duration::from_secs(5),
        Command::new(env!("CARGO_BIN_EXE_concerts"))
            .env("CONCERTS_CONFIG", config_path)
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = RunningServer::start(ticketing_stub(42).await).await;

    let (status, body) = server.get_json("/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint() {
    let ticketing = ticketing_stub(42).await;
    let server = RunningServer::start(ticketing).await;

    let (status, body) = server.get_json("/api/v1/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["server"]["port"], server.port);
    assert_eq!(body["discovery"]["backend"], "static");
    assert_eq!(body["discovery"]["services"][0], ticketing.to_string());
}

#[tokio::test]
async fn test_resolve_calls_registered_ticketing_service() {
    let server = RunningServer::start(ticketing_stub(17).await).await;

    let created = server
        .client
        .post(server.url("/api/v1/concerts"))
        .json(&json!({
            "id": "c1",
            "name": "Autumn Night",
            "band": "The Residents",
            "concert_date": "2026-11-20T20:00:00Z"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let (status, body) = server.get_json("/api/v1/concerts/c1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available_tickets"], "17");

    let metrics = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("concerts_resolve_total{result=\"ok\"} 1"));
    assert!(metrics.contains("concerts_ticketing_request_duration_seconds"));
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let output = run_until_exit(Path::new("/nonexistent/config.toml")).await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_missing_discovery_section_exits_with_error() {
    let config = write_config("[server]\nport = 8080\n");
    let output = run_until_exit(config.path()).await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_kubernetes_backend_without_section_exits_with_error() {
    let config = write_config("[discovery]\nbackend = \"kubernetes\"\n");
    let output = run_until_exit(config.path()).await;
    assert!(!output.status.success());
}
