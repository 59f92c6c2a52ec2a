//! Exchange rate results with provenance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::query::RateQuery;
use crate::error::DomainError;

/// Provider name recorded on rates produced by the base == quote short-circuit.
pub const IDENTITY_PROVIDER: &str = "identity";

/// A resolved exchange rate.
///
/// `value` is the number of quote units one base unit buys. It is always
/// strictly positive, including when read back from a serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRate")]
pub struct Rate {
    query: RateQuery,
    value: Decimal,
    provider: String,
    retrieved_at: DateTime<Utc>,
}

impl Rate {
    /// Creates a rate retrieved now.
    pub fn new(
        query: RateQuery,
        value: Decimal,
        provider: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::NonPositiveRate(value));
        }
        Ok(Self {
            query,
            value,
            provider: provider.into(),
            retrieved_at: Utc::now(),
        })
    }

    /// Creates a rate from a floating point quote, as returned by JSON APIs.
    pub fn from_f64(
        query: RateQuery,
        value: f64,
        provider: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NonFiniteRate(value.to_string()));
        }
        // f64 Display is the shortest round-tripping form and never uses exponents.
        let decimal = Decimal::from_str(&value.to_string())
            .map_err(|_| DomainError::NonFiniteRate(value.to_string()))?;
        Self::new(query, decimal, provider)
    }

    /// The trivial rate of 1 for base == quote.
    pub fn identity(query: RateQuery) -> Self {
        Self {
            query,
            value: Decimal::ONE,
            provider: IDENTITY_PROVIDER.to_string(),
            retrieved_at: Utc::now(),
        }
    }

    pub fn query(&self) -> &RateQuery {
        &self.query
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Name of the provider that produced this rate.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn retrieved_at(&self) -> DateTime<Utc> {
        self.retrieved_at
    }
}

/// Unchecked wire form of [`Rate`].
#[derive(Deserialize)]
struct RawRate {
    query: RateQuery,
    value: Decimal,
    provider: String,
    retrieved_at: DateTime<Utc>,
}

impl TryFrom<RawRate> for Rate {
    type Error = DomainError;

    fn try_from(raw: RawRate) -> Result<Self, Self::Error> {
        let rate = Rate::new(raw.query, raw.value, raw.provider)?;
        Ok(Self {
            retrieved_at: raw.retrieved_at,
            ..rate
        })
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.query, self.value, self.provider)
    }
}
