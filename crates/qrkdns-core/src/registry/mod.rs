//! Plugin-based provider registry
//!
//! Provider crates register a factory under their type name, and the
//! binary builds whichever provider the configuration names without a
//! hard-coded match on provider kinds.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qrkdns_core::ProviderRegistry;
//!
//! let registry = ProviderRegistry::new();
//! qrkdns_provider_cloudflare::register(&registry);
//!
//! let provider = registry.create_provider(&config.provider)?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Provider registry for plugin-based DNS provider creation
///
/// Uses interior mutability with RwLock, allowing concurrent reads and
/// exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under `name`
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let name = name.into();
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.insert(name, factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// The configuration is validated before the factory sees it.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the provider type is not registered or the
    /// configuration is incomplete; otherwise whatever the factory reports.
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        config.validate()?;

        let provider_type = config.type_name();
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("unsupported DNS provider: {}", provider_type)))?;

        factory.create(config)
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self
            .providers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        providers.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl DnsProviderFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
            Err(Error::provider("mock", "Mock provider not implemented"))
        }
    }

    fn cloudflare_config() -> ProviderConfig {
        ProviderConfig::Cloudflare {
            account_id: "account".to_string(),
            api_token: "token".to_string(),
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("cloudflare"));

        registry.register_provider("cloudflare", Box::new(MockProviderFactory));

        assert!(registry.has_provider("cloudflare"));
        assert_eq!(registry.list_providers(), vec!["cloudflare".to_string()]);
    }

    #[test]
    fn test_unregistered_provider_is_config_error() {
        let registry = ProviderRegistry::new();

        let err = registry.create_provider(&cloudflare_config()).err().unwrap();
        assert!(matches!(err, Error::Config(ref m) if m == "unsupported DNS provider: cloudflare"));
    }

    #[test]
    fn test_factory_sees_only_valid_config() {
        let registry = ProviderRegistry::new();
        registry.register_provider("cloudflare", Box::new(MockProviderFactory));

        let config = ProviderConfig::Cloudflare {
            account_id: String::new(),
            api_token: "token".to_string(),
        };
        let err = registry.create_provider(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));

        let err = registry.create_provider(&cloudflare_config()).err().unwrap();
        assert!(err.is_provider());
    }
}
