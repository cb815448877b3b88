//! Ticketing service integration.
//!
//! The ticketing service answers `GET /tickets` with a plain integer: the
//! number of tickets still available. That is the whole contract.

mod http_client;

pub use http_client::HttpTicketingClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::discovery::ServiceEndpoint;

/// Errors that can occur when querying the ticketing service.
#[derive(Debug, Error)]
pub enum TicketingError {
    /// HTTP request failed (connection, timeout, ...).
    #[error("HTTP request to ticketing service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Ticketing service answered with a non-success status.
    #[error("Ticketing service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not an integer count.
    #[error("Ticketing service returned a non-integer count: {0:?}")]
    InvalidCount(String),
}

/// Trait for clients of the ticketing service.
#[async_trait]
pub trait TicketingClient: Send + Sync {
    /// Current number of available tickets reported by `endpoint`.
    async fn available_tickets(&self, endpoint: &ServiceEndpoint) -> Result<i64, TicketingError>;
}

/// Parse a ticketing response body into a count.
pub fn parse_count(body: &str) -> Result<i64, TicketingError> {
    let trimmed = body.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| TicketingError::InvalidCount(trimmed.to_string()))
}
