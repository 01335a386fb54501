//! Provider loader for building the registry from configuration

use super::catalog::CatalogProvider;
use super::registry::ProviderRegistry;
use super::traits::SearchProvider;
use crate::config::{ProviderConfig, Settings};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all providers from settings, in configuration order
    ///
    /// Providers that fail to build are logged and skipped. A duplicate name is a
    /// configuration error and aborts loading.
    pub fn load(settings: &Settings) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();

        for config in settings.providers.iter().filter(|p| p.disabled) {
            info!("Skipping disabled provider: {}", config.name);
        }

        for config in settings.enabled_providers() {
            match Self::create_provider(config) {
                Ok(provider) => {
                    info!("Loaded provider: {} ({})", config.name, config.kind);
                    registry.register(provider)?;
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {:#}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    /// Create a provider instance by kind
    fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn SearchProvider>> {
        match config.kind.as_str() {
            "catalog" => {
                let mut items = config.items.clone();
                if let Some(ref path) = config.path {
                    items.extend(CatalogProvider::load_items(path)?);
                }

                let provider = CatalogProvider::new(&config.name, &config.category, items)
                    .with_fields(config.fields.clone());
                Ok(Arc::new(provider))
            }
            other => Err(anyhow::anyhow!(
                "Unknown provider kind: {} (available: {})",
                other,
                Self::available_kinds().join(", ")
            )),
        }
    }

    /// Get list of available provider kinds
    pub fn available_kinds() -> Vec<&'static str> {
        vec!["catalog"]
    }
}
