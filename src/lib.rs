//! fedsearch: federated search over independent result providers
//!
//! Queries several providers, each returning its own ranked ids for a free-text
//! query, and merges them into fixed-size pages. Slots a provider cannot fill on a
//! page are handed to providers with more results.

pub mod config;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{RegistryError, SearchError};
pub use providers::{ProviderRegistry, SearchProvider};
pub use query::Query;
pub use results::{ResultId, SearchResult};
pub use search::{Aggregator, PageResult, SearchOptions};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
