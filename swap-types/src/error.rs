//! Error types for exchange rate resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain-level errors (invalid values).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrencyCode(String),

    #[error("Invalid currency pair: {0:?} (expected BASE/QUOTE)")]
    InvalidCurrencyPair(String),

    #[error("Rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    #[error("Rate is not a finite decimal: {0}")]
    NonFiniteRate(String),
}

/// Failures of the outbound transport itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Errors a single provider can return for a query.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("API error {code}: {info}")]
    Api { code: i64, info: String },

    #[error("Invalid rate: {0}")]
    InvalidRate(#[from] DomainError),
}

impl ProviderError {
    /// Classifies the error for the chain's fallthrough policy.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::UnsupportedQuery(_) => FailureKind::UnsupportedQuery,
            ProviderError::QuoteUnavailable(_) => FailureKind::QuoteUnavailable,
            ProviderError::Transport(_)
            | ProviderError::HttpStatus { .. }
            | ProviderError::MalformedPayload(_)
            | ProviderError::Api { .. }
            | ProviderError::InvalidRate(_) => FailureKind::Transport,
        }
    }
}

/// Coarse classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedQuery,
    QuoteUnavailable,
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::UnsupportedQuery => "unsupported query",
            FailureKind::QuoteUnavailable => "quote unavailable",
            FailureKind::Transport => "transport error",
        };
        f.write_str(label)
    }
}

/// One entry of a chain's diagnostic trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, error: &ProviderError) -> Self {
        Self {
            provider: provider.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.provider, self.kind, self.message)
    }
}

/// Errors crossing the exchanger boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No provider could resolve {query} ({} failures)", .failures.len())]
    ChainExhausted {
        query: String,
        failures: Vec<ProviderFailure>,
    },

    #[error(transparent)]
    InvalidQuery(#[from] DomainError),
}

/// Errors raised while assembling an exchanger.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Invalid options for provider {provider}: {reason}")]
    InvalidOptions { provider: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors reported by a cache store backend.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("TTL out of range: {0:?}")]
    InvalidTtl(std::time::Duration),
}
