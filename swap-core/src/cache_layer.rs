//! Cache key derivation and TTL policy in front of the chain.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use swap_types::{BuildError, CacheStore, QueryOptions, Rate, RateQuery, ResolveError};
use tracing::{debug, warn};

use crate::chain::Chain;

/// Keys are `prefix + digest` and never exceed this length.
pub const MAX_KEY_LEN: usize = 64;

const DIGEST_LEN: usize = 40;

/// Longest prefix that keeps keys within [`MAX_KEY_LEN`].
pub const MAX_PREFIX_LEN: usize = MAX_KEY_LEN - DIGEST_LEN;

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// TTL applied when the query options carry none. Zero disables storing.
    pub ttl: Duration,
    /// Prepended to every key; lets several exchangers share one store.
    pub key_prefix: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            key_prefix: String::new(),
        }
    }
}

impl CacheSettings {
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.key_prefix.len() > MAX_PREFIX_LEN {
            return Err(BuildError::InvalidConfig(format!(
                "cache key prefix {:?} exceeds {} characters",
                self.key_prefix, MAX_PREFIX_LEN
            )));
        }
        Ok(())
    }
}

/// Memoizes successful chain resolutions. Failures are never stored.
///
/// Concurrent misses for the same key each invoke the chain.
pub struct CacheLayer {
    chain: Chain,
    store: Arc<dyn CacheStore>,
    settings: CacheSettings,
}

impl CacheLayer {
    pub fn new(chain: Chain, store: Arc<dyn CacheStore>, settings: CacheSettings) -> Self {
        Self {
            chain,
            store,
            settings,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Key for `query` against this layer's chain.
    pub fn cache_key(&self, query: &RateQuery) -> String {
        let date = query
            .date()
            .map_or_else(|| "latest".to_string(), |d| d.to_string());
        let material = format!(
            "{}|{}|{}|{}",
            query.base(),
            query.quote(),
            date,
            self.chain.identity()
        );
        let digest = hex::encode(Sha256::digest(material.as_bytes()));
        format!("{}{}", self.settings.key_prefix, &digest[..DIGEST_LEN])
    }

    pub async fn resolve(
        &self,
        query: &RateQuery,
        options: &QueryOptions,
    ) -> Result<Rate, ResolveError> {
        if !options.use_cache {
            return self.chain.resolve(query).await;
        }

        let key = self.cache_key(query);
        match self.store.get(&key).await {
            Ok(Some(rate)) => {
                debug!(query = %query, key = %key, "Cache hit");
                return Ok(rate);
            }
            Ok(None) => debug!(query = %query, key = %key, "Cache miss"),
            Err(e) => warn!(query = %query, error = %e, "Cache lookup failed, resolving uncached"),
        }

        let rate = self.chain.resolve(query).await?;

        let ttl = options.cache_ttl.unwrap_or(self.settings.ttl);
        if !ttl.is_zero() {
            if let Err(e) = self.store.set(&key, rate.clone(), ttl).await {
                warn!(query = %query, error = %e, "Failed to store rate in cache");
            }
        }

        Ok(rate)
    }
}

impl fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLayer")
            .field("chain", &self.chain)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
