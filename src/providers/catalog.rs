//! In-memory catalog provider
//!
//! Serves a fixed list of items, either configured inline or loaded from a YAML file.

use super::filter::PhraseFilter;
use super::traits::SearchProvider;
use crate::query::Query;
use crate::results::{ResultId, Route, SearchResult};
use crate::search::SearchOptions;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// Query option restricting matches to the city given in the search options
pub const CITY_ONLY_OPTION: &str = "search_in_city_only";

/// Search option carrying the city used by [`CITY_ONLY_OPTION`]
pub const CITY_KEY: &str = "city";

/// A single catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub route: String,
    pub route_params: BTreeMap<String, String>,
    pub meta: String,
    pub city: Option<String>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    fn field(&self, field: CatalogField) -> &str {
        match field {
            CatalogField::Title => &self.title,
            CatalogField::Description => &self.description,
            CatalogField::Meta => &self.meta,
        }
    }
}

/// Item fields the phrase filter looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogField {
    Title,
    Description,
    Meta,
}

/// Fields searched when none are configured
pub fn default_fields() -> Vec<CatalogField> {
    vec![CatalogField::Title, CatalogField::Description]
}

/// Provider backed by an in-memory list of items
pub struct CatalogProvider {
    name: String,
    category: String,
    fields: Vec<CatalogField>,
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl CatalogProvider {
    /// Create a catalog searching the default fields
    ///
    /// Ids are unique within a catalog: later items reusing an id are dropped.
    pub fn new(name: impl Into<String>, category: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        let name = name.into();
        let mut index = HashMap::with_capacity(items.len());
        let mut unique = Vec::with_capacity(items.len());

        for item in items {
            if index.contains_key(&item.id) {
                warn!("Catalog {} has duplicate item id {}, keeping the first", name, item.id);
                continue;
            }
            index.insert(item.id.clone(), unique.len());
            unique.push(item);
        }

        Self {
            name,
            category: category.into(),
            fields: default_fields(),
            items: unique,
            index,
        }
    }

    /// Set the searched fields
    pub fn with_fields(mut self, fields: Vec<CatalogField>) -> Self {
        if !fields.is_empty() {
            self.fields = fields;
        }
        self
    }

    /// Load items from a YAML file holding a list of [`CatalogItem`]
    pub fn load_items<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogItem>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let items = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
        Ok(items)
    }

    /// Number of items in the catalog
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn city_restriction<'a>(&self, query: &Query, options: &'a SearchOptions) -> Option<&'a str> {
        if !query.has_option(CITY_ONLY_OPTION) {
            return None;
        }

        let city = options.get_str(CITY_KEY);
        if city.is_none() {
            debug!(
                "Provider {} got {} without a city, ignoring",
                self.name, CITY_ONLY_OPTION
            );
        }
        city
    }

    fn to_result(&self, item: &CatalogItem) -> SearchResult {
        let mut route = Route::new(item.route.clone());
        route.parameters = item.route_params.clone();

        let mut result = SearchResult::new(item.title.clone())
            .with_category(self.category.clone())
            .with_description(item.description.clone())
            .with_route(route)
            .with_meta(item.meta.clone());
        result.preview_image = item.image.clone();
        result
    }
}

#[async_trait]
impl SearchProvider for CatalogProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "catalog"
    }

    fn category(&self) -> &str {
        &self.category
    }

    async fn fetch_ids(
        &self,
        query: &Query,
        options: &SearchOptions,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<ResultId>> {
        let filter = PhraseFilter::from_query(query);
        let city = self.city_restriction(query, options);

        let ids: Vec<ResultId> = self
            .items
            .iter()
            .filter(|item| match (city, item.city.as_deref()) {
                (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
                (Some(_), None) => false,
                (None, _) => true,
            })
            .filter(|item| {
                filter.is_unrestricted()
                    || filter.matches(self.fields.iter().map(|f| item.field(*f)))
            })
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .map(|item| ResultId::new(item.id.clone()))
            .collect();

        debug!("Catalog {} matched {} ids for '{}'", self.name, ids.len(), query);
        Ok(ids)
    }

    async fn hydrate(&self, ids: &[ResultId]) -> Result<Vec<SearchResult>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.index.get(id.as_str()))
            .map(|&position| self.to_result(&self.items[position]))
            .collect())
    }
}
