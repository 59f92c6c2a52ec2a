//! Currency codes and currency pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A currency code, normalised to upper case.
///
/// ISO 4217 codes (`EUR`, `USD`) and the longer tickers some providers
/// serve (`DOGE`) are both accepted. The code must be non-empty ASCII
/// alphanumeric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a validated currency code.
    pub fn new(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// An ordered pair of currencies: how many `quote` units one `base` unit buys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Builds a pair from two raw codes.
    pub fn from_codes(base: &str, quote: &str) -> Result<Self, DomainError> {
        Ok(Self::new(CurrencyCode::new(base)?, CurrencyCode::new(quote)?))
    }

    /// Returns true when base and quote are the same currency.
    pub fn is_identical(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = DomainError;

    /// Parses `"EUR/USD"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| DomainError::InvalidCurrencyPair(s.to_string()))?;
        if quote.contains('/') {
            return Err(DomainError::InvalidCurrencyPair(s.to_string()));
        }
        Self::from_codes(base, quote)
    }
}
