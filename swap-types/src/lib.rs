//! # Swap Types
//!
//! Domain types and port traits for the Swap exchange rate resolver.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the workspace:
//! - `domain/` - Pure domain types (CurrencyCode, CurrencyPair, RateQuery, Rate)
//! - `ports/` - Trait definitions that providers, transports and cache stores implement
//! - `error/` - Domain, provider, resolve and build error types

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{CurrencyCode, CurrencyPair, IDENTITY_PROVIDER, QueryOptions, Rate, RateQuery};
pub use error::{
    BuildError, CacheError, DomainError, FailureKind, ProviderError, ProviderFailure,
    ResolveError, TransportError,
};
pub use ports::{
    CacheStore, HttpContext, HttpRequest, HttpResponse, ProviderOptions, RateProvider,
    RequestFactory, Transport, redact_url,
};
