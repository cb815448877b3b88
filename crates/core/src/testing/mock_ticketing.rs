//! Mock ticketing client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::discovery::ServiceEndpoint;
use crate::ticketing::{TicketingClient, TicketingError};

/// What the mock ticketing service answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockTicketingResponse {
    /// A valid integer count.
    Count(i64),
    /// A non-success HTTP status.
    Status(u16, String),
    /// A body that is not an integer.
    InvalidBody(String),
}

/// Mock implementation of the TicketingClient trait.
///
/// Records every endpoint it was asked about, so tests can assert that a
/// remote call did or did not happen.
#[derive(Debug)]
pub struct MockTicketingClient {
    response: Arc<RwLock<MockTicketingResponse>>,
    requests: Arc<RwLock<Vec<ServiceEndpoint>>>,
}

impl Default for MockTicketingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketingClient {
    /// Create a mock answering `0`.
    pub fn new() -> Self {
        Self::with_count(0)
    }

    /// Create a mock answering `count`.
    pub fn with_count(count: i64) -> Self {
        Self {
            response: Arc::new(RwLock::new(MockTicketingResponse::Count(count))),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Answer `count` from now on.
    pub async fn set_count(&self, count: i64) {
        self.set_response(MockTicketingResponse::Count(count)).await;
    }

    /// Set the next answers.
    pub async fn set_response(&self, response: MockTicketingResponse) {
        *self.response.write().await = response;
    }

    /// Endpoints queried so far.
    pub async fn recorded_requests(&self) -> Vec<ServiceEndpoint> {
        self.requests.read().await.clone()
    }

    /// Number of queries made.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl TicketingClient for MockTicketingClient {
    async fn available_tickets(&self, endpoint: &ServiceEndpoint) -> Result<i64, TicketingError> {
        self.requests.write().await.push(endpoint.clone());

        match self.response.read().await.clone() {
            MockTicketingResponse::Count(count) => Ok(count),
            MockTicketingResponse::Status(status, body) => {
                Err(TicketingError::Status { status, body })
            }
            MockTicketingResponse::InvalidBody(body) => Err(TicketingError::InvalidCount(body)),
        }
    }
}
