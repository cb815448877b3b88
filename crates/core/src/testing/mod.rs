//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the store, registry and
//! ticketing traits, allowing the concert service to be exercised without a
//! database, a cluster or a ticketing deployment.
//!
//! # Example
//!
//! ```rust,ignore
//! use concerts_core::testing::{MockDiscoveryRegistry, MockTicketingClient};
//!
//! let registry = MockDiscoveryRegistry::with_services(["ticket-svc-7"]);
//! let ticketing = MockTicketingClient::with_count(42);
//!
//! // Use in ConcertService::new(...)
//! ```

mod mock_concert_store;
mod mock_discovery;
mod mock_ticketing;

pub use mock_concert_store::MockConcertStore;
pub use mock_discovery::MockDiscoveryRegistry;
pub use mock_ticketing::{MockTicketingClient, MockTicketingResponse};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::concert::{Concert, NewConcert};

    /// A fixed concert date.
    pub fn concert_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, 20, 20, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// Create an insertion request with reasonable defaults.
    pub fn new_concert(name: &str) -> NewConcert {
        NewConcert::new(name, "The House Band", concert_date())
    }

    /// Create an undecorated, stored-looking concert.
    pub fn concert(id: &str, name: &str) -> Concert {
        Concert {
            id: id.to_string(),
            name: name.to_string(),
            band: "The House Band".to_string(),
            concert_date: concert_date(),
            available_tickets: None,
            is_deleted: false,
        }
    }
}
