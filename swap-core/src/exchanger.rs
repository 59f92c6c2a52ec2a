//! Public exchange rate resolver.

use chrono::NaiveDate;
use swap_types::{CurrencyPair, QueryOptions, Rate, RateQuery, ResolveError};
use tracing::instrument;

use crate::cache_layer::CacheLayer;

/// Resolves rate queries through the cache layer and provider chain.
///
/// Only a `Rate` or `ResolveError::ChainExhausted` crosses this boundary
/// for typed queries; individual provider failures are folded into the
/// exhausted error's trail.
#[derive(Debug)]
pub struct Exchanger {
    cache: CacheLayer,
}

impl Exchanger {
    pub fn new(cache: CacheLayer) -> Self {
        Self { cache }
    }

    /// Names of the chained providers, in fallback order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.cache.chain().provider_names()
    }

    /// Resolves `query` with default options.
    pub async fn resolve(&self, query: &RateQuery) -> Result<Rate, ResolveError> {
        self.resolve_with(query, &QueryOptions::default()).await
    }

    /// Resolves `query`. Identical currencies short-circuit to 1 without
    /// touching the cache or any provider.
    #[instrument(skip(self, options), fields(query = %query))]
    pub async fn resolve_with(
        &self,
        query: &RateQuery,
        options: &QueryOptions,
    ) -> Result<Rate, ResolveError> {
        if query.is_identity() {
            return Ok(Rate::identity(query.clone()));
        }
        self.cache.resolve(query, options).await
    }

    /// Latest rate for a pair written as `"EUR/USD"`.
    pub async fn latest(&self, pair: &str) -> Result<Rate, ResolveError> {
        let pair: CurrencyPair = pair.parse()?;
        self.resolve(&RateQuery::latest(pair)).await
    }

    /// Rate for a pair written as `"EUR/USD"` on `date`.
    pub async fn historical(&self, pair: &str, date: NaiveDate) -> Result<Rate, ResolveError> {
        let pair: CurrencyPair = pair.parse()?;
        self.resolve(&RateQuery::historical(pair, date)).await
    }
}
