//! # Swap Core
//!
//! The exchange rate resolver: an ordered chain of providers behind a cache layer.
//!
//! ## Architecture
//!
//! - `chain` - Tries providers in registration order, first success wins
//! - `cache_layer` - Key derivation and TTL policy over a `CacheStore`
//! - `exchanger` - Public resolver (identity short-circuit + cache layer)
//! - `builder` - `SwapConfig` and the fluent `SwapBuilder` assembling an `Exchanger`
//!
//! ```ignore
//! use serde_json::json;
//! use swap_core::SwapBuilder;
//!
//! let exchanger = SwapBuilder::new()
//!     .add_provider("fixer", json!({"access_key": "..."}).as_object().cloned().unwrap())
//!     .add_provider("frankfurter", Default::default())
//!     .build()?;
//!
//! let rate = exchanger.latest("EUR/USD").await?;
//! println!("{} via {}", rate.value(), rate.provider());
//! ```

pub mod builder;
pub mod cache_layer;
pub mod chain;
pub mod exchanger;


pub use builder::{ProviderSpec, SwapBuilder, SwapConfig, assemble};
pub use cache_layer::{CacheLayer, CacheSettings};
pub use chain::{Chain, ChainConfig};
pub use exchanger::Exchanger;
