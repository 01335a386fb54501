//! Search orchestration module
//!
//! Fans a query out to all registered providers, lays out the requested page
//! across them and merges the hydrated results.

mod executor;
mod models;
pub mod pagination;

pub use executor::Aggregator;
pub use models::*;
