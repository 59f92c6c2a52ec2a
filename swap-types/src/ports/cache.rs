//! Cache store port.

use std::time::Duration;

use crate::domain::Rate;
use crate::error::CacheError;

/// Minimal key/value store with per-entry TTL.
///
/// Implementations must be safe for concurrent use. Expired entries must
/// be reported as absent.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live entry for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Rate>, CacheError>;

    /// Stores `rate` under `key` for `ttl`.
    async fn set(&self, key: &str, rate: Rate, ttl: Duration) -> Result<(), CacheError>;
}
