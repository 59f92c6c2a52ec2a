//! Built-in Exchange Rate Providers
//!
//! Every provider implements the `RateProvider` port and is constructed by
//! name through the [`ProviderRegistry`]:
//!
//! | name             | source                                   | historical |
//! |------------------|------------------------------------------|------------|
//! | `static`         | fixed table from options                 | optional   |
//! | `fixer`          | fixer.io (EUR base unless enterprise)    | yes        |
//! | `currency_layer` | currencylayer.com (USD source unless enterprise) | yes |
//! | `frankfurter`    | frankfurter.app (ECB reference rates)    | yes        |
//!
//! # Adding a New Provider
//! Implement `RateProvider` and register a factory under a new name:
//! ```ignore
//! let mut registry = ProviderRegistry::with_defaults();
//! registry.register("my_bank", |name, options, http| {
//!     Ok(Arc::new(MyBankProvider::from_options(name, options, http)?))
//! });
//! ```

pub mod currency_layer;
pub mod fixer;
pub mod frankfurter;
mod http;
mod options;
pub mod registry;
pub mod static_rates;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use currency_layer::CurrencyLayerProvider;
pub use fixer::FixerProvider;
pub use frankfurter::FrankfurterProvider;
pub use registry::{ProviderFactory, ProviderRegistry};
pub use static_rates::StaticRateProvider;
