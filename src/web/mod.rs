//! Web server module
//!
//! Provides the JSON HTTP API for fedsearch.

mod handlers;
mod routes;
mod state;

pub use handlers::{ProviderResponse, SearchParams, SearchResponse};
pub use routes::create_router;
pub use state::AppState;
