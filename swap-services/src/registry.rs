//! Maps provider names to factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use swap_types::{BuildError, HttpContext, ProviderOptions, RateProvider};

use crate::{
    CurrencyLayerProvider, FixerProvider, FrankfurterProvider, StaticRateProvider, currency_layer,
    fixer, frankfurter, static_rates,
};

/// Constructs a provider from its registered name, options and HTTP context.
pub type ProviderFactory = Arc<
    dyn Fn(&str, &ProviderOptions, &HttpContext) -> Result<Arc<dyn RateProvider>, BuildError>
        + Send
        + Sync,
>;

/// Registry of named provider factories. Consulted only when assembling an exchanger.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in provider.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(static_rates::NAME, |name, options, _http| {
                Ok(Arc::new(StaticRateProvider::from_options(name, options)?))
            })
            .register(fixer::NAME, |name, options, http| {
                Ok(Arc::new(FixerProvider::from_options(name, options, http)?))
            })
            .register(currency_layer::NAME, |name, options, http| {
                Ok(Arc::new(CurrencyLayerProvider::from_options(
                    name, options, http,
                )?))
            })
            .register(frankfurter::NAME, |name, options, http| {
                Ok(Arc::new(FrankfurterProvider::from_options(
                    name, options, http,
                )?))
            });
        registry
    }

    /// Registers (or replaces) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&str, &ProviderOptions, &HttpContext) -> Result<Arc<dyn RateProvider>, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Constructs the provider registered under `name`.
    pub fn create(
        &self,
        name: &str,
        options: &ProviderOptions,
        http: &HttpContext,
    ) -> Result<Arc<dyn RateProvider>, BuildError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BuildError::UnknownProvider(name.to_string()))?;
        factory(name, options, http)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("names", &self.names())
            .finish()
    }
}
