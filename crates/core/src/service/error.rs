use thiserror::Error;

use crate::concert::StoreError;
use crate::discovery::DiscoveryError;
use crate::ticketing::TicketingError;

/// Errors surfaced by [`super::ConcertService`] operations.
///
/// None of these is retried or replaced by a default value.
#[derive(Debug, Error)]
pub enum ConcertError {
    #[error("No concert found with id: {0}")]
    NotFound(String),

    #[error("No concert found with name containing: {0}")]
    NoMatchByName(String),

    #[error("More than one ticket service registered: {0:?}")]
    AmbiguousService(Vec<String>),

    #[error("No ticket service registered")]
    ServiceUnavailable,

    #[error("Ticket availability query failed: {0}")]
    RemoteCallFailure(#[from] TicketingError),

    #[error("Service discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Concert storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl ConcertError {
    /// Stable snake_case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConcertError::NotFound(_) => "not_found",
            ConcertError::NoMatchByName(_) => "no_match_by_name",
            ConcertError::AmbiguousService(_) => "ambiguous_service",
            ConcertError::ServiceUnavailable => "service_unavailable",
            ConcertError::RemoteCallFailure(_) => "remote_call_failure",
            ConcertError::Discovery(_) => "discovery",
            ConcertError::Storage(_) => "storage",
        }
    }
}
