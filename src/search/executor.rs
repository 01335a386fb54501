//! Search execution and page aggregation

use super::models::{PageResult, SearchOptions};
use super::pagination::{self, PageSlice};
use crate::error::{ProviderStage, SearchError};
use crate::metrics::Metrics;
use crate::providers::{ProviderKey, ProviderRegistry, SearchProvider};
use crate::query::Query;
use crate::results::{natural_cmp, ResultId, SearchResult};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Aggregator that pages results across all registered providers
///
/// Holds no per-query state; every call recomputes the layout from the providers'
/// current ids.
pub struct Aggregator {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Optional metrics collector
    metrics: Option<Arc<Metrics>>,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            metrics: None,
        }
    }

    /// Record provider calls into a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Get the provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Get one page of results
    ///
    /// Every provider gets `block_size` slots per page. Slots a provider cannot fill
    /// are handed to providers with more results, so a page holds exactly
    /// `providers * block_size` results while enough remain.
    ///
    /// Any provider failure aborts the call.
    pub async fn query(
        &self,
        query: &Query,
        options: &SearchOptions,
        page: usize,
        block_size: usize,
    ) -> Result<PageResult, SearchError> {
        if let Some(metrics) = &self.metrics {
            metrics.inc_query();
        }

        let result = self.run(query, options, page, block_size).await;

        if result.is_err() {
            if let Some(metrics) = &self.metrics {
                metrics.inc_failed_query();
            }
        }
        result
    }

    async fn run(
        &self,
        query: &Query,
        options: &SearchOptions,
        page: usize,
        block_size: usize,
    ) -> Result<PageResult, SearchError> {
        if self.registry.is_empty() {
            return Err(SearchError::NoProvidersRegistered);
        }
        if page == 0 {
            return Err(SearchError::InvalidPage(page));
        }
        if block_size == 0 {
            return Err(SearchError::InvalidBlockSize(block_size));
        }

        let providers: Vec<_> = self.registry.iter().collect();
        let per_page = pagination::per_page(providers.len(), block_size);

        // all ids of all providers, cheap to fetch and enough for the page layout
        let id_lists = try_join_all(
            providers
                .iter()
                .map(|(key, provider)| self.fetch_ids(key, provider, query, options)),
        )
        .await?;

        let lengths: Vec<usize> = id_lists.iter().map(Vec::len).collect();
        let total: usize = lengths.iter().sum();
        let slices = pagination::layout_page(&lengths, page, block_size);

        // only the ids on this page get hydrated
        let batches = try_join_all(providers.iter().zip(&id_lists).zip(&slices).map(
            |(((key, provider), ids), slice)| self.hydrate(key, provider, ids, *slice),
        ))
        .await?;

        let mut results: Vec<SearchResult> = batches.into_iter().flatten().collect();
        results.sort_by(|a, b| natural_cmp(&a.title, &b.title));

        info!(
            "Query '{}' page {}: {} of {} results from {} providers",
            query,
            page,
            results.len(),
            total,
            providers.len()
        );

        Ok(PageResult {
            results,
            total,
            per_page,
            page,
        })
    }

    /// Fetch the complete id list of one provider
    async fn fetch_ids(
        &self,
        key: &ProviderKey,
        provider: &Arc<dyn SearchProvider>,
        query: &Query,
        options: &SearchOptions,
    ) -> Result<Vec<ResultId>, SearchError> {
        let start = Instant::now();

        match provider.fetch_ids(query, options, 0, None).await {
            Ok(ids) => {
                let elapsed = start.elapsed();
                debug!("Provider {} returned {} ids in {:?}", key, ids.len(), elapsed);
                if let Some(metrics) = &self.metrics {
                    metrics.record_fetch(key.as_str(), ids.len(), elapsed);
                }
                Ok(ids)
            }
            Err(e) => {
                warn!("Id fetch failed for {}: {:#}", key, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(key.as_str());
                }
                Err(SearchError::provider(key, ProviderStage::Fetch, e))
            }
        }
    }

    /// Hydrate the ids one provider contributes to the page
    async fn hydrate(
        &self,
        key: &ProviderKey,
        provider: &Arc<dyn SearchProvider>,
        ids: &[ResultId],
        slice: PageSlice,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if slice.is_empty() {
            debug!("Provider {} has nothing on this page", key);
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let page_ids = &ids[slice.range()];

        match provider.hydrate(page_ids).await {
            Ok(results) => {
                let elapsed = start.elapsed();
                debug!(
                    "Provider {} hydrated {} of {} ids (offset {}) in {:?}",
                    key,
                    results.len(),
                    page_ids.len(),
                    slice.offset,
                    elapsed
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_hydration(key.as_str(), results.len(), elapsed);
                }
                Ok(results)
            }
            Err(e) => {
                warn!("Hydration failed for {}: {:#}", key, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(key.as_str());
                }
                Err(SearchError::provider(key, ProviderStage::Hydrate, e))
            }
        }
    }
}
