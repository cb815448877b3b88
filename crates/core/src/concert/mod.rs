//! Concert records and their storage.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteConcertStore;
pub use store::{ConcertStore, StoreError};
pub use types::{stored_precision, Concert, ConcertPatch, NewConcert};
