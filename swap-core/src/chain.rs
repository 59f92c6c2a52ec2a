//! Ordered provider fallback.

use std::fmt;
use std::sync::Arc;

use swap_types::{FailureKind, ProviderFailure, Rate, RateProvider, RateQuery, ResolveError};
use tracing::{debug, warn};

/// Fallthrough policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainConfig {
    /// Stop at the first transport-class failure instead of trying the next provider.
    pub stop_on_transport_error: bool,
}

/// Providers tried in registration order; the first success wins.
///
/// The order is fixed at construction.
#[derive(Clone, Default)]
pub struct Chain {
    providers: Vec<Arc<dyn RateProvider>>,
    config: ChainConfig,
}

impl Chain {
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self::with_config(providers, ChainConfig::default())
    }

    pub fn with_config(providers: Vec<Arc<dyn RateProvider>>, config: ChainConfig) -> Self {
        Self { providers, config }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Stable identity of the provider set, used in cache keys.
    pub fn identity(&self) -> String {
        self.provider_names().join(",")
    }

    /// Resolves the query with the first provider that succeeds.
    ///
    /// Fails with `ChainExhausted` carrying one failure per attempted provider.
    pub async fn resolve(&self, query: &RateQuery) -> Result<Rate, ResolveError> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.resolve(query).await {
                Ok(rate) => {
                    debug!(
                        provider = provider.name(),
                        query = %query,
                        value = %rate.value(),
                        "Got rate from provider"
                    );
                    return Ok(rate);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        query = %query,
                        kind = %e.kind(),
                        error = %e,
                        "Provider failed to return rate"
                    );
                    let failure = ProviderFailure::new(provider.name(), &e);
                    let stop = self.config.stop_on_transport_error
                        && failure.kind == FailureKind::Transport;
                    failures.push(failure);
                    if stop {
                        break;
                    }
                }
            }
        }

        Err(ResolveError::ChainExhausted {
            query: query.to_string(),
            failures,
        })
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("providers", &self.provider_names())
            .field("config", &self.config)
            .finish()
    }
}
