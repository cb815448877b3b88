//! Concert storage trait and error type.

use async_trait::async_trait;
use thiserror::Error;

use super::{Concert, NewConcert};

/// Error type for concert storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concert with this identifier already exists.
    #[error("Concert already exists: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Trait for concert storage backends.
///
/// Pure persistence: no decoration, no discovery. Every method returns only
/// once the underlying store has acknowledged the operation.
#[async_trait]
pub trait ConcertStore: Send + Sync {
    /// Insert a new concert, assigning an identifier when none is given.
    async fn insert(&self, concert: NewConcert) -> Result<Concert, StoreError>;

    /// List every stored concert, soft-deleted ones included.
    async fn find_all(&self) -> Result<Vec<Concert>, StoreError>;

    /// Get a concert by ID.
    async fn find_by_id(&self, id: &str) -> Result<Option<Concert>, StoreError>;

    /// Substring search on the concert name.
    ///
    /// Case folding covers ASCII letters only, as SQLite `LIKE` does:
    /// `"jazz"` matches `"JAZZ"`, but `"jäzz"` does not match `"JÄZZ"`.
    async fn find_by_name(&self, fragment: &str) -> Result<Vec<Concert>, StoreError>;

    /// Persist the concert's stored fields, inserting it if missing.
    async fn save(&self, concert: &Concert) -> Result<Concert, StoreError>;
}
