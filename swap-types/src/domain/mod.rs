//! Domain models for exchange rate resolution.

pub mod currency;
pub mod query;
pub mod rate;

pub use currency::{CurrencyCode, CurrencyPair};
pub use query::{QueryOptions, RateQuery};
pub use rate::{IDENTITY_PROVIDER, Rate};
