//! In-process cache store with per-entry TTL.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use swap_types::{CacheError, CacheStore, Rate};
use tracing::debug;

/// Cached rate entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: Rate,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Entry limit used by [`MemoryCacheStore::new`].
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Thread-safe in-memory store.
///
/// Expired entries are dropped lazily on lookup, by
/// [`evict_expired`](Self::evict_expired), and whenever an insert finds the
/// store at capacity. If every entry is still live at capacity, the one
/// closest to expiry makes room.
#[derive(Debug)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `max_entries` rates (at least one).
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Removes one entry.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all expired entries.
    pub fn evict_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }

    /// Frees a slot for a new key when the store is full.
    fn make_room(&self, key: &str) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(key) {
            return;
        }

        self.evict_expired();
        if self.entries.len() < self.max_entries {
            return;
        }

        let soonest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.expires_at)
            .map(|entry| entry.key().clone());
        if let Some(victim) = soonest {
            debug!(key = %victim, "Cache full, evicting entry closest to expiry");
            self.entries.remove(&victim);
        }
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let total = self.entries.len();
        let live = self.entries.iter().filter(|e| e.is_live(now)).count();

        CacheStats {
            total_entries: total,
            live_entries: live,
            expired_entries: total - live,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Rate>, CacheError> {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.rate.clone()));
            }
            drop(entry);
            debug!(key, "Dropping expired cache entry");
            // A concurrent set may have refreshed the key since the read.
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, rate: Rate, ttl: Duration) -> Result<(), CacheError> {
        let delta = TimeDelta::from_std(ttl).map_err(|_| CacheError::InvalidTtl(ttl))?;
        let expires_at = Utc::now()
            .checked_add_signed(delta)
            .ok_or(CacheError::InvalidTtl(ttl))?;

        self.make_room(key);
        self.entries
            .insert(key.to_string(), CacheEntry { rate, expires_at });
        Ok(())
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub live_entries: usize,
    pub expired_entries: usize,
}
