//! Provider registry: lookup by key with a guaranteed fallback.

use tracing::{info, warn};

use crate::capabilities::Capabilities;
use crate::error::OverlayError;
use crate::provider::OverlayProvider;
use crate::providers::{FieldOverlayProvider, ResourceOverlayProvider};

/// Builds a provider from the host capabilities.
pub type ProviderFactory = fn(&Capabilities) -> Box<dyn OverlayProvider>;

/// Key of the provider used when the requested one is unavailable.
pub const DEFAULT_PROVIDER: &str = FieldOverlayProvider::KEY;

/// Ordered set of provider factories, keyed by name.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<(&'static str, ProviderFactory)>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in resource and field providers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry
            .entries
            .push((ResourceOverlayProvider::KEY, build_resource));
        registry.entries.push((FieldOverlayProvider::KEY, build_field));
        registry
    }

    /// Add a provider factory under `key`.
    ///
    /// # Errors
    ///
    /// [`OverlayError::DuplicateProvider`] if the key is taken.
    pub fn register(
        &mut self,
        key: &'static str,
        factory: ProviderFactory,
    ) -> Result<(), OverlayError> {
        if self.contains(key) {
            return Err(OverlayError::DuplicateProvider(key.to_string()));
        }
        self.entries.push((key, factory));
        Ok(())
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Build the provider registered under `key`.
    ///
    /// # Errors
    ///
    /// [`OverlayError::UnknownProvider`] if nothing is registered under `key`,
    /// [`OverlayError::NotActivatable`] if its data source is missing.
    pub fn build(
        &self,
        key: &str,
        caps: &Capabilities,
    ) -> Result<Box<dyn OverlayProvider>, OverlayError> {
        let (_, factory) = self
            .entries
            .iter()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| OverlayError::UnknownProvider(key.to_string()))?;
        let provider = factory(caps);
        if !provider.can_activate() {
            return Err(OverlayError::NotActivatable(key.to_string()));
        }
        Ok(provider)
    }

    /// Build `key`, falling back to the default provider when it cannot be
    /// used. Never fails.
    pub fn resolve(&self, key: &str, caps: &Capabilities) -> Box<dyn OverlayProvider> {
        match self.build(key, caps) {
            Ok(provider) => {
                info!("Overlay provider: {}", provider.gui_name());
                provider
            }
            Err(e) => {
                warn!("{e}, falling back to '{DEFAULT_PROVIDER}'");
                self.build(DEFAULT_PROVIDER, caps)
                    .unwrap_or_else(|_| build_field(caps))
            }
        }
    }

    /// Keys whose providers can activate with these capabilities.
    pub fn activatable(&self, caps: &Capabilities) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, factory)| factory(caps).can_activate())
            .map(|(k, _)| *k)
            .collect()
    }
}

fn build_resource(caps: &Capabilities) -> Box<dyn OverlayProvider> {
    Box::new(ResourceOverlayProvider::new(caps))
}

fn build_field(caps: &Capabilities) -> Box<dyn OverlayProvider> {
    Box::new(FieldOverlayProvider::new(caps))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::test_support::{FixedAbundance, FnProvider};

    fn full_caps() -> Capabilities {
        Capabilities {
            abundance: Some(Rc::new(FixedAbundance)),
            ..Capabilities::default()
        }
    }

    #[test]
    fn test_builtin_keys() {
        let registry = ProviderRegistry::with_builtin();
        assert_eq!(registry.keys().collect::<Vec<_>>(), ["resource", "field"]);
    }

    #[test]
    fn test_build_known_provider() {
        let registry = ProviderRegistry::with_builtin();
        let p = registry.build("resource", &full_caps()).unwrap();
        assert_eq!(p.key(), "resource");
    }

    #[test]
    fn test_build_errors() {
        let registry = ProviderRegistry::with_builtin();
        let err = registry.build("nope", &full_caps()).err().unwrap();
        assert!(matches!(err, OverlayError::UnknownProvider(k) if k == "nope"));

        let err = registry.build("resource", &Capabilities::default()).err().unwrap();
        assert!(matches!(err, OverlayError::NotActivatable(k) if k == "resource"));
    }

    #[test]
    fn test_resolve_falls_back_to_field() {
        let registry = ProviderRegistry::with_builtin();
        assert_eq!(registry.resolve("resource", &Capabilities::default()).key(), "field");
        assert_eq!(registry.resolve("missing", &full_caps()).key(), "field");
        assert_eq!(registry.resolve("resource", &full_caps()).key(), "resource");
    }

    #[test]
    fn test_resolve_on_empty_registry_still_yields_provider() {
        let registry = ProviderRegistry::new();
        assert_eq!(registry.resolve("resource", &full_caps()).key(), "field");
    }

    fn build_fn(_caps: &Capabilities) -> Box<dyn OverlayProvider> {
        Box::new(FnProvider::new(|_, _| 1.0))
    }

    #[test]
    fn test_register_custom_and_duplicate() {
        let mut registry = ProviderRegistry::with_builtin();
        registry.register("fn", build_fn).unwrap();
        assert!(registry.contains("fn"));
        let err = registry.register("field", build_field);
        assert!(matches!(err, Err(OverlayError::DuplicateProvider(_))));
    }

    #[test]
    fn test_activatable_lists_usable_providers() {
        let registry = ProviderRegistry::with_builtin();
        assert_eq!(registry.activatable(&Capabilities::default()), ["field"]);
        assert_eq!(registry.activatable(&full_caps()), ["resource", "field"]);
    }
}
