//! Provider traits and types

use crate::query::Query;
use crate::results::{ResultId, SearchResult};
use crate::search::SearchOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key a provider is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ProviderKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A source of search results for one sub-domain of content
///
/// Ids are cheap to fetch and are used for all pagination bookkeeping; only the ids
/// that land on the requested page get hydrated into full results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, also the default registry key
    fn name(&self) -> &str;

    /// Descriptive tag of the provider implementation
    fn kind(&self) -> &str {
        "custom"
    }

    /// Category label attached to hydrated results
    fn category(&self) -> &str {
        "general"
    }

    /// Fetch matching ids, sorted the same way for repeated calls on unchanged data
    ///
    /// `limit = None` means no upper bound.
    async fn fetch_ids(
        &self,
        query: &Query,
        options: &SearchOptions,
        offset: usize,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<ResultId>>;

    /// Turn ids into results; output order does not need to follow `ids`
    async fn hydrate(&self, ids: &[ResultId]) -> anyhow::Result<Vec<SearchResult>>;
}
