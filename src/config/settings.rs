//! Settings structures for fedsearch configuration

use crate::providers::{CatalogField, CatalogItem};
use crate::query::{QueryOptionMap, DEFAULT_TOKEN_LIMIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure, read from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    /// Providers in registration order
    pub providers: Vec<ProviderConfig>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse settings {}", path.display()))
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (FEDSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("FEDSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(port) = var("FEDSEARCH_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("FEDSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(size) = var("FEDSEARCH_BLOCK_SIZE").and_then(|v| v.parse().ok()) {
            self.search.block_size = size;
        }
        if let Some(limit) = var("FEDSEARCH_TOKEN_LIMIT").and_then(|v| v.parse().ok()) {
            self.search.token_limit = limit;
        }
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "fedsearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Slots reserved for every provider on one page
    pub block_size: usize,
    /// Upper bound for a per-request block size override
    pub max_block_size: usize,
    /// Maximum number of query tokens
    pub token_limit: usize,
    /// Short codes usable as `!code` in queries
    pub options: QueryOptionMap,
}

impl Default for SearchSettings {
    fn default() -> Self {
        let mut options = QueryOptionMap::new();
        options.insert("c".to_string(), "search_in_city_only".to_string());

        Self {
            block_size: 5,
            max_block_size: 50,
            token_limit: DEFAULT_TOKEN_LIMIT,
            options,
        }
    }
}

impl SearchSettings {
    /// Resolve the block size for one request
    ///
    /// Zero is passed through so the caller gets a proper validation error.
    pub fn effective_block_size(&self, requested: Option<usize>) -> usize {
        requested
            .map(|size| size.min(self.max_block_size))
            .unwrap_or(self.block_size)
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique registry key)
    pub name: String,
    /// Provider implementation to use
    pub kind: String,
    /// Category label for results
    pub category: String,
    /// Whether provider is disabled
    pub disabled: bool,
    /// Searched fields (catalog providers)
    pub fields: Vec<CatalogField>,
    /// Inline items (catalog providers)
    pub items: Vec<CatalogItem>,
    /// YAML file with more items (catalog providers)
    pub path: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: "catalog".to_string(),
            category: "general".to_string(),
            disabled: false,
            fields: vec![],
            items: vec![],
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8890);
        assert_eq!(settings.search.block_size, 5);
        assert_eq!(settings.search.token_limit, 10);
        assert_eq!(
            settings.search.options.get("c").map(String::as_str),
            Some("search_in_city_only")
        );
        assert!(settings.providers.is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let settings = Settings::from_yaml(
            r#"
search:
  block_size: 3
providers:
  - name: events
    category: Events
    fields: [title, meta]
    items:
      - id: "1"
        title: The Analogs live
  - name: users
    disabled: true
"#,
        )
        .unwrap();

        assert_eq!(settings.search.block_size, 3);
        assert_eq!(settings.search.token_limit, 10);
        assert_eq!(settings.providers.len(), 2);

        let events = &settings.providers[0];
        assert_eq!(events.kind, "catalog");
        assert_eq!(events.fields, [CatalogField::Title, CatalogField::Meta]);
        assert_eq!(events.items[0].title, "The Analogs live");
        let enabled: Vec<&str> = settings
            .enabled_providers()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(enabled, ["events"]);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FEDSEARCH_PORT", "9000"),
            ("FEDSEARCH_BLOCK_SIZE", "7"),
            ("FEDSEARCH_TOKEN_LIMIT", "not a number"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.merge_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.search.block_size, 7);
        assert_eq!(settings.search.token_limit, 10);
    }

    #[test]
    fn test_effective_block_size() {
        let search = SearchSettings::default();
        assert_eq!(search.effective_block_size(None), 5);
        assert_eq!(search.effective_block_size(Some(8)), 8);
        assert_eq!(search.effective_block_size(Some(500)), 50);
        assert_eq!(search.effective_block_size(Some(0)), 0);
    }
}
