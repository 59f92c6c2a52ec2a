//! Rate queries and per-call options.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::currency::{CurrencyCode, CurrencyPair};
use crate::error::DomainError;

/// A request for the rate of a currency pair, either latest or at a date.
///
/// Equality and hashing cover base, quote and date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateQuery {
    pair: CurrencyPair,
    date: Option<NaiveDate>,
}

impl RateQuery {
    /// Query for the most recent rate.
    pub fn latest(pair: CurrencyPair) -> Self {
        Self { pair, date: None }
    }

    /// Query for the rate published on `date`.
    pub fn historical(pair: CurrencyPair, date: NaiveDate) -> Self {
        Self {
            pair,
            date: Some(date),
        }
    }

    /// Builds a query from raw currency codes.
    pub fn new(base: &str, quote: &str, date: Option<NaiveDate>) -> Result<Self, DomainError> {
        Ok(Self {
            pair: CurrencyPair::from_codes(base, quote)?,
            date,
        })
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.pair.base
    }

    pub fn quote(&self) -> &CurrencyCode {
        &self.pair.quote
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_historical(&self) -> bool {
        self.date.is_some()
    }

    /// True when base == quote; such queries resolve to 1 without any provider.
    pub fn is_identity(&self) -> bool {
        self.pair.is_identical()
    }
}

impl fmt::Display for RateQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}@{}", self.pair, date),
            None => write!(f, "{}@latest", self.pair),
        }
    }
}

/// Per-call options. Not part of query identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Look up and store the result in the cache.
    pub use_cache: bool,
    /// Overrides the configured cache TTL for this call.
    pub cache_ttl: Option<Duration>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_ttl: None,
        }
    }
}

impl QueryOptions {
    /// Options that skip the cache entirely.
    pub fn uncached() -> Self {
        Self {
            use_cache: false,
            cache_ttl: None,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
}
