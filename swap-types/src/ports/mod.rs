//! Port traits (interfaces for adapters).
//!
//! These are the contracts that providers, transports and cache stores implement.
//! The resolver core depends on these traits, not concrete implementations.

mod cache;
mod provider;
mod transport;

pub use cache::CacheStore;
pub use provider::{ProviderOptions, RateProvider};
pub use transport::{
    HttpContext, HttpRequest, HttpResponse, RequestFactory, Transport, redact_url,
};
