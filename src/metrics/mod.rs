//! Metrics collection module
//!
//! Tracks provider performance, error rates, and query counts.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Number of response times kept per provider
const RESPONSE_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct ProviderCounters {
    fetches: u64,
    ids_fetched: u64,
    hydrations: u64,
    results_hydrated: u64,
    errors: u64,
    response_times: Vec<u64>,
}

impl ProviderCounters {
    fn record_time(&mut self, elapsed: Duration) {
        if self.response_times.len() >= RESPONSE_WINDOW {
            self.response_times.remove(0);
        }
        self.response_times.push(elapsed.as_millis() as u64);
    }
}

/// Metrics collector shared by all queries
#[derive(Debug, Default)]
pub struct Metrics {
    total_queries: AtomicU64,
    failed_queries: AtomicU64,
    providers: RwLock<HashMap<String, ProviderCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total query count
    pub fn inc_query(&self) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query that ended with an error
    pub fn inc_failed_query(&self) {
        self.failed_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful id fetch
    pub fn record_fetch(&self, provider: &str, ids: usize, elapsed: Duration) {
        self.with_provider(provider, |counters| {
            counters.fetches += 1;
            counters.ids_fetched += ids as u64;
            counters.record_time(elapsed);
        });
    }

    /// Record a successful hydration
    pub fn record_hydration(&self, provider: &str, results: usize, elapsed: Duration) {
        self.with_provider(provider, |counters| {
            counters.hydrations += 1;
            counters.results_hydrated += results as u64;
            counters.record_time(elapsed);
        });
    }

    /// Record a provider error
    pub fn record_error(&self, provider: &str) {
        self.with_provider(provider, |counters| counters.errors += 1);
    }

    /// Get total queries
    pub fn get_total_queries(&self) -> u64 {
        self.total_queries.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all statistics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            total_queries: self.get_total_queries(),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            providers: providers
                .iter()
                .map(|(name, counters)| (name.clone(), ProviderStats::from_counters(counters)))
                .collect(),
        }
    }

    fn with_provider<F>(&self, provider: &str, update: F)
    where
        F: FnOnce(&mut ProviderCounters),
    {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        update(providers.entry(provider.to_string()).or_default());
    }
}

/// Point-in-time copy of the metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub failed_queries: u64,
    pub providers: BTreeMap<String, ProviderStats>,
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub fetches: u64,
    pub ids_fetched: u64,
    pub hydrations: u64,
    pub results_hydrated: u64,
    pub errors: u64,
    pub avg_response_time: Option<u64>,
    /// Share of successful calls, in percent
    pub reliability: f64,
}

impl ProviderStats {
    fn from_counters(counters: &ProviderCounters) -> Self {
        let calls = counters.fetches + counters.hydrations;
        let total = calls + counters.errors;

        Self {
            fetches: counters.fetches,
            ids_fetched: counters.ids_fetched,
            hydrations: counters.hydrations,
            results_hydrated: counters.results_hydrated,
            errors: counters.errors,
            avg_response_time: if counters.response_times.is_empty() {
                None
            } else {
                Some(
                    counters.response_times.iter().sum::<u64>()
                        / counters.response_times.len() as u64,
                )
            },
            reliability: if total == 0 {
                100.0
            } else {
                (calls as f64 / total as f64) * 100.0
            },
        }
    }
}
