//! Result types and ordering
//!
//! Hydrated search results as handed back by providers, and the natural
//! ordering used to merge them into one page.

mod natural;
mod types;

pub use natural::natural_cmp;
pub use types::*;
