//! HTTP surface of the concerts service.

pub mod api;
pub mod metrics;
pub mod state;
