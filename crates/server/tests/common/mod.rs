//! Common test utilities for E2E testing with mocks.
//!
//! The fixture builds an in-process router over a real SQLite store in a temp
//! directory, with the discovery registry and ticketing client replaced by
//! controllable mocks.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use concerts_core::{
    testing::{MockDiscoveryRegistry, MockTicketingClient},
    ConcertsConfig, Config, DatabaseConfig, DiscoveryBackend, DiscoveryConfig, NoMatchPolicy,
    ServerConfig, SqliteConcertStore, TicketingConfig,
};

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use concerts_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_resolve() {
///     let fixture = TestFixture::new().await;
///     fixture.ticketing.set_count(42).await;
///
///     let response = fixture.get("/api/v1/concerts/c1").await;
///     assert_eq!(response.body["available_tickets"], "42");
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock registry - control which ticketing services are registered
    pub registry: Arc<MockDiscoveryRegistry>,
    /// Mock ticketing client - control the availability answer
    pub ticketing: Arc<MockTicketingClient>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a fixture with one registered ticketing service answering 42.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let registry = Arc::new(MockDiscoveryRegistry::with_services(
            test_config.services.clone(),
        ));
        let ticketing = Arc::new(MockTicketingClient::with_count(test_config.ticket_count));

        let config = Config {
            discovery: DiscoveryConfig {
                backend: DiscoveryBackend::Static,
                services: test_config.services,
                ignore: Vec::new(),
                kubernetes: None,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            ticketing: TicketingConfig::default(),
            concerts: ConcertsConfig {
                no_match_by_name: test_config.no_match_by_name,
            },
        };

        let store = Arc::new(
            SqliteConcertStore::new(&db_path).expect("Failed to create concert store"),
        );

        let state = Arc::new(
            concerts_server::state::AppState::new(
                config,
                store,
                Arc::clone(&registry) as Arc<dyn concerts_core::DiscoveryRegistry>,
                Arc::clone(&ticketing) as Arc<dyn concerts_core::TicketingClient>,
            )
            .expect("Failed to create app state"),
        );

        let router = concerts_server::api::create_router(state);

        Self {
            router,
            registry,
            ticketing,
            temp_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(body.to_string())).await
    }

    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, path, Some(body.to_string())).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.send(Method::DELETE, path, None).await
    }

    /// POST an arbitrary string as JSON, for malformed-body tests.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.send(Method::POST, path, Some(body.to_string())).await
    }

    async fn send(&self, method: Method, path: &str, json: Option<String>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match json {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Service names the registry reports
    pub services: Vec<String>,
    /// Count the mock ticketing service answers with
    pub ticket_count: i64,
    /// Name search behaviour
    pub no_match_by_name: NoMatchPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            services: vec!["ticket-svc".to_string()],
            ticket_count: 42,
            no_match_by_name: NoMatchPolicy::Error,
        }
    }
}

#[allow(dead_code)]
impl TestConfig {
    /// Create config where empty name searches return an empty list.
    pub fn with_empty_searches() -> Self {
        Self {
            no_match_by_name: NoMatchPolicy::Empty,
            ..Self::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
