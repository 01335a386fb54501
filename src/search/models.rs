//! Search options and page models

use crate::results::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller supplied options forwarded to every provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchOptions(HashMap<String, serde_json::Value>);

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Get a string option
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One page of merged results
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// Results on this page, in natural title order
    pub results: Vec<SearchResult>,
    /// Count of all results of all providers
    pub total: usize,
    /// Size of a full page
    pub per_page: usize,
    /// Page number (1-indexed)
    pub page: usize,
}

impl PageResult {
    /// Number of pages needed for all results
    pub fn page_count(&self) -> usize {
        if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Whether no page follows this one
    pub fn is_last_page(&self) -> bool {
        self.page >= self.page_count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
