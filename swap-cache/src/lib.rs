//! # Swap Cache
//!
//! Concrete cache store implementations (adapters) for the `CacheStore` port.

pub mod memory;

pub use memory::{CacheStats, DEFAULT_MAX_ENTRIES, MemoryCacheStore};
