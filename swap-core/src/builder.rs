//! Assembly of an `Exchanger` from configuration and collaborators.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use swap_cache::MemoryCacheStore;
use swap_client::{DefaultRequestFactory, ReqwestTransport};
use swap_services::ProviderRegistry;
use swap_types::{
    BuildError, CacheStore, HttpContext, ProviderOptions, RateProvider, RequestFactory, Transport,
};
use tracing::info;

use crate::cache_layer::{CacheLayer, CacheSettings};
use crate::chain::{Chain, ChainConfig};
use crate::exchanger::Exchanger;

/// A provider to construct: registry name plus its options.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSpec {
    pub name: String,
    pub options: ProviderOptions,
}

/// Everything needed to assemble an exchanger, minus the collaborators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwapConfig {
    /// Providers in fallback order.
    pub providers: Vec<ProviderSpec>,
    pub cache: CacheSettings,
    pub chain: ChainConfig,
}

impl SwapConfig {
    /// Appends a provider, or replaces the options of an already added one in place.
    pub fn add_provider(&mut self, name: impl Into<String>, options: ProviderOptions) {
        let name = name.into();
        match self.providers.iter_mut().find(|spec| spec.name == name) {
            Some(spec) => spec.options = options,
            None => self.providers.push(ProviderSpec { name, options }),
        }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        self.cache.validate()
    }
}

/// Assembles providers, chain, cache layer and exchanger.
///
/// Providers are created through `registry` in configuration order.
pub fn assemble(
    config: &SwapConfig,
    registry: &ProviderRegistry,
    http: &HttpContext,
    store: Arc<dyn CacheStore>,
) -> Result<Exchanger, BuildError> {
    config.validate()?;

    let providers = config
        .providers
        .iter()
        .map(|spec| registry.create(&spec.name, &spec.options, http))
        .collect::<Result<Vec<Arc<dyn RateProvider>>, BuildError>>()?;

    let chain = Chain::with_config(providers, config.chain.clone());
    info!(
        providers = %chain.identity(),
        ttl_secs = config.cache.ttl.as_secs(),
        "Assembled exchange rate chain"
    );

    let cache = CacheLayer::new(chain, store, config.cache.clone());
    Ok(Exchanger::new(cache))
}

/// Fluent front over [`SwapConfig`] and [`assemble`].
///
/// `build` borrows the builder, so it can be called repeatedly; every call
/// constructs fresh providers and, unless a store was supplied with
/// [`use_cache`](Self::use_cache), a fresh in-memory cache.
#[derive(Clone)]
pub struct SwapBuilder {
    config: SwapConfig,
    registry: ProviderRegistry,
    transport: Option<Arc<dyn Transport>>,
    request_factory: Option<Arc<dyn RequestFactory>>,
    cache: Option<Arc<dyn CacheStore>>,
}

impl SwapBuilder {
    /// A builder with the built-in provider registry and default settings.
    pub fn new() -> Self {
        Self::from_config(SwapConfig::default())
    }

    pub fn from_config(config: SwapConfig) -> Self {
        Self {
            config,
            registry: ProviderRegistry::with_defaults(),
            transport: None,
            request_factory: None,
            cache: None,
        }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Adds a provider at the end of the chain; re-adding a name replaces its options.
    pub fn add_provider(mut self, name: impl Into<String>, options: ProviderOptions) -> Self {
        self.config.add_provider(name, options);
        self
    }

    /// Uses the given transport for HTTP providers.
    pub fn use_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses the given request factory for HTTP providers.
    pub fn use_request_factory(mut self, factory: Arc<dyn RequestFactory>) -> Self {
        self.request_factory = Some(factory);
        self
    }

    /// Uses the given cache store. It is shared by every exchanger this builder builds.
    pub fn use_cache(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(store);
        self
    }

    /// Replaces the provider registry.
    pub fn use_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers an additional provider factory.
    pub fn register_provider<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&str, &ProviderOptions, &HttpContext) -> Result<Arc<dyn RateProvider>, BuildError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(name, factory);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache.ttl = ttl;
        self
    }

    pub fn cache_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.cache.key_prefix = prefix.into();
        self
    }

    pub fn stop_on_transport_error(mut self, stop: bool) -> Self {
        self.config.chain.stop_on_transport_error = stop;
        self
    }

    /// Builds an independent exchanger.
    pub fn build(&self) -> Result<Exchanger, BuildError> {
        let transport: Arc<dyn Transport> = match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(
                ReqwestTransport::new().map_err(|e| BuildError::InvalidConfig(e.to_string()))?,
            ),
        };
        let requests: Arc<dyn RequestFactory> = match &self.request_factory {
            Some(factory) => factory.clone(),
            None => Arc::new(DefaultRequestFactory::new()),
        };
        let store: Arc<dyn CacheStore> = match &self.cache {
            Some(store) => store.clone(),
            None => Arc::new(MemoryCacheStore::new()),
        };

        assemble(
            &self.config,
            &self.registry,
            &HttpContext::new(transport, requests),
            store,
        )
    }
}

impl Default for SwapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SwapBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapBuilder")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("custom_transport", &self.transport.is_some())
            .field("custom_request_factory", &self.request_factory.is_some())
            .field("custom_cache", &self.cache.is_some())
            .finish()
    }
}
