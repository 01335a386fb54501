//! Result type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a candidate result within one provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResultId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResultId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ResultId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Navigation target of a result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route name
    pub name: String,
    /// Route parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Add a route parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A single entry on the search results list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Display title, used for ordering
    pub title: String,
    /// Category label (usually the provider's category)
    #[serde(default)]
    pub category: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Preview image reference
    pub preview_image: Option<String>,
    /// Where the result leads to
    #[serde(default)]
    pub route: Route,
    /// Auxiliary text (dates, places)
    #[serde(default)]
    pub meta: String,
}

impl SearchResult {
    /// Create a new result
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_preview_image(mut self, image: impl Into<String>) -> Self {
        self.preview_image = Some(image.into());
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_builder() {
        let result = SearchResult::new("The Analogs")
            .with_category("events")
            .with_route(Route::new("event_show").param("id", "42"))
            .with_meta("2017-05-01, Szczecin");

        assert_eq!(result.title, "The Analogs");
        assert_eq!(result.category, "events");
        assert_eq!(result.route.parameters.get("id").map(String::as_str), Some("42"));
        assert!(result.preview_image.is_none());
    }

    #[test]
    fn test_result_id_serializes_as_string() {
        let id = ResultId::from(7u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }
}
