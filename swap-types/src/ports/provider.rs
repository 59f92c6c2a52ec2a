//! Exchange rate provider port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, static tables, mock providers, etc.

use crate::domain::{Rate, RateQuery};
use crate::error::ProviderError;

/// Options passed to a provider factory, as a JSON object.
pub type ProviderOptions = serde_json::Map<String, serde_json::Value>;

/// Port trait for exchange rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// The name this provider was registered under; recorded on every rate it produces.
    fn name(&self) -> &str;

    /// Attempts to answer the query.
    ///
    /// Returns `UnsupportedQuery` when the provider cannot serve this class of
    /// query at all, `QuoteUnavailable` when it has no data for the pair or date,
    /// and a transport-class error when the underlying call failed.
    async fn resolve(&self, query: &RateQuery) -> Result<Rate, ProviderError>;
}
