//! Error types for the search core

use crate::providers::ProviderKey;
use std::fmt;
use thiserror::Error;

/// Stage of a provider call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStage {
    /// Fetching candidate ids
    Fetch,
    /// Hydrating ids into results
    Hydrate,
}

impl fmt::Display for ProviderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "id fetch"),
            Self::Hydrate => write!(f, "hydration"),
        }
    }
}

/// Errors returned by [`crate::search::Aggregator::query`]
#[derive(Debug, Error)]
pub enum SearchError {
    /// The registry handed to the aggregator is empty
    #[error("No data providers registered")]
    NoProvidersRegistered,

    /// A provider failed; the whole page is aborted
    #[error("Provider {provider} failed during {stage}: {source}")]
    Provider {
        provider: ProviderKey,
        stage: ProviderStage,
        #[source]
        source: anyhow::Error,
    },

    /// Pages are 1-indexed
    #[error("Invalid page number: {0}")]
    InvalidPage(usize),

    /// Every provider needs at least one slot per page
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),
}

impl SearchError {
    pub(crate) fn provider(provider: &ProviderKey, stage: ProviderStage, source: anyhow::Error) -> Self {
        Self::Provider {
            provider: provider.clone(),
            stage,
            source,
        }
    }
}

/// Errors raised while building a provider registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two providers were registered under the same key
    #[error("Provider \"{incoming}\" at key \"{key}\" is already taken by \"{existing}\"")]
    DuplicateProvider {
        key: ProviderKey,
        /// Kind of the provider already registered
        existing: String,
        /// Kind of the provider that was rejected
        incoming: String,
    },
}
