//! Provider registry keeping providers in registration order

use super::traits::{ProviderKey, SearchProvider};
use crate::error::RegistryError;
use std::sync::Arc;

/// Ordered registry of search providers
///
/// Iteration order is registration order. Pagination and result merging both
/// depend on it staying the same between calls.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<(ProviderKey, Arc<dyn SearchProvider>)>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name
    pub fn register(
        &mut self,
        provider: Arc<dyn SearchProvider>,
    ) -> Result<&mut Self, RegistryError> {
        let key = ProviderKey::new(provider.name());
        self.register_as(key, provider)
    }

    /// Register a provider under an explicit key
    pub fn register_as(
        &mut self,
        key: impl Into<ProviderKey>,
        provider: Arc<dyn SearchProvider>,
    ) -> Result<&mut Self, RegistryError> {
        let key = key.into();

        if let Some(existing) = self.get(key.as_str()) {
            return Err(RegistryError::DuplicateProvider {
                key,
                existing: existing.kind().to_string(),
                incoming: provider.kind().to_string(),
            });
        }

        self.providers.push((key, provider));
        Ok(self)
    }

    /// Get a provider by key
    pub fn get(&self, key: &str) -> Option<&Arc<dyn SearchProvider>> {
        self.providers
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, provider)| provider)
    }

    /// Iterate providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&ProviderKey, &Arc<dyn SearchProvider>)> {
        self.providers.iter().map(|(key, provider)| (key, provider))
    }

    /// Get all keys in registration order
    pub fn keys(&self) -> Vec<&ProviderKey> {
        self.providers.iter().map(|(key, _)| key).collect()
    }

    /// Check if a provider exists
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CatalogProvider;

    fn catalog(name: &str) -> Arc<dyn SearchProvider> {
        Arc::new(CatalogProvider::new(name, "events", vec![]))
    }

    #[test]
    fn test_registration_order() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(catalog("users"))
            .unwrap()
            .register(catalog("articles"))
            .unwrap()
            .register_as("agenda", catalog("events"))
            .unwrap();

        let keys: Vec<&str> = registry.keys().into_iter().map(ProviderKey::as_str).collect();
        assert_eq!(keys, ["users", "articles", "agenda"]);
        assert!(registry.contains("agenda"));
        assert!(!registry.contains("events"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register(catalog("events")).unwrap();

        let err = registry.register(catalog("events")).err().unwrap();
        assert_eq!(
            err,
            RegistryError::DuplicateProvider {
                key: ProviderKey::from("events"),
                existing: "catalog".to_string(),
                incoming: "catalog".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
        assert!(err.to_string().contains("\"events\""));
    }
}
