//! Concert service orchestration.

mod concert_service;
mod error;

pub use concert_service::ConcertService;
pub use error::ConcertError;
