//! Search provider module
//!
//! Defines the provider capability consumed by the aggregator, an ordered registry of
//! providers, and an in-memory catalog provider.

mod catalog;
mod filter;
mod loader;
mod registry;
mod traits;

pub use catalog::{
    default_fields, CatalogField, CatalogItem, CatalogProvider, CITY_KEY, CITY_ONLY_OPTION,
};
pub use filter::PhraseFilter;
pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;
