//! Cache Pool Module
//!
//! The cache engine: HashMap storage combined with an insertion-order index,
//! an LRU recency index, TTL expiry and bulk maintenance operations for the
//! housekeeping tick.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use crate::cache::{CacheEntry, CacheStats, CacheValue, KeyList};
use crate::error::{CacheError, Result};

/// Name of the single pool this server exposes.
pub const POOL_NAME: &str = "default";

// == Pool Status ==
/// Snapshot of the pool orderings, rendered for the `status` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
    /// Live entry count
    pub items: usize,
    /// First-inserted key still present
    pub oldest: Option<String>,
    /// Most recently first-inserted key
    pub newest: Option<String>,
    /// Least recently used key
    pub least_recently_used: Option<String>,
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dash(key: &Option<String>) -> &str {
            key.as_deref().unwrap_or("-")
        }
        write!(
            f,
            "items={}; oldest={}; newest={}; lru={}",
            self.items,
            dash(&self.oldest),
            dash(&self.newest),
            dash(&self.least_recently_used)
        )
    }
}

// == Cache Pool ==
/// Main cache storage with TTL expiry and two ordered key indices.
///
/// The key set of `entries`, `insertion` and `recency` is always identical;
/// every key appears exactly once in each ordering. Dead (expired) entries
/// are discarded lazily by any operation that touches their key, and in bulk
/// by [`clear_stale`](CachePool::clear_stale).
#[derive(Debug, Default)]
pub struct CachePool {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Keys in the order they were first inserted (not touched on update)
    insertion: KeyList,
    /// Keys from least to most recently used
    recency: KeyList,
    /// Activity counters
    stats: CacheStats,
}

impl CachePool {
    // == Constructor ==
    /// Creates a new empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    // == Add ==
    /// Inserts a new entry, failing if a live entry already holds the key.
    pub fn add(
        &mut self,
        key: &str,
        value: CacheValue,
        ttl_seconds: u64,
        now: Instant,
    ) -> Result<()> {
        self.discard_if_expired(key, now);
        if self.entries.contains_key(key) {
            return Err(CacheError::KeyExists(key.to_string()));
        }
        self.insert_entry(key, value, ttl_seconds, now);
        Ok(())
    }

    // == Set ==
    /// Inserts or overwrites an entry unconditionally.
    ///
    /// An overwrite leaves the insertion order untouched; the key still
    /// moves to the most-recently-used end of the recency index.
    pub fn set(&mut self, key: &str, value: CacheValue, ttl_seconds: u64, now: Instant) {
        self.discard_if_expired(key, now);
        self.insert_entry(key, value, ttl_seconds, now);
    }

    // == Replace ==
    /// Overwrites an entry only if a live one exists for the key.
    pub fn replace(
        &mut self,
        key: &str,
        value: CacheValue,
        ttl_seconds: u64,
        now: Instant,
    ) -> Result<()> {
        if self.discard_if_expired(key, now) {
            return Err(CacheError::Expired(key.to_string()));
        }
        if !self.entries.contains_key(key) {
            return Err(CacheError::NotFound(key.to_string()));
        }
        self.insert_entry(key, value, ttl_seconds, now);
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit touches the entry and promotes the key to most recently used.
    /// An expired entry is removed synchronously before the miss is
    /// reported, keeping reads consistent with `clear_stale`.
    pub fn get(&mut self, key: &str, now: Instant) -> Result<CacheValue> {
        if self.discard_if_expired(key, now) {
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.recency.promote(key);
                self.stats.record_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Has ==
    /// Checks for a live entry, with the same touch and expiry policy as
    /// [`get`](CachePool::get).
    pub fn has(&mut self, key: &str, now: Instant) -> bool {
        self.get(key, now).is_ok()
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &str, now: Instant) -> Result<()> {
        if self.discard_if_expired(key, now) {
            return Err(CacheError::Expired(key.to_string()));
        }
        if self.entries.remove(key).is_some() {
            self.insertion.remove(key);
            self.recency.remove(key);
            self.stats.set_total_entries(self.entries.len());
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Increment / Decrement ==
    /// Adds one to the entry's value, coercing it to an integer first.
    ///
    /// The entry becomes integer-typed. When `ttl_seconds` is supplied and
    /// greater than zero, the expiry window restarts from `now`.
    pub fn increment(&mut self, key: &str, ttl_seconds: Option<u64>, now: Instant) -> Result<i64> {
        self.apply_delta(key, 1, ttl_seconds, now)
    }

    /// Subtracts one from the entry's value; otherwise identical to
    /// [`increment`](CachePool::increment).
    pub fn decrement(&mut self, key: &str, ttl_seconds: Option<u64>, now: Instant) -> Result<i64> {
        self.apply_delta(key, -1, ttl_seconds, now)
    }

    fn apply_delta(
        &mut self,
        key: &str,
        delta: i64,
        ttl_seconds: Option<u64>,
        now: Instant,
    ) -> Result<i64> {
        if self.discard_if_expired(key, now) {
            return Err(CacheError::Expired(key.to_string()));
        }
        let Some(entry) = self.entries.get_mut(key) else {
            return Err(CacheError::NotFound(key.to_string()));
        };

        let next = entry.value.to_integer().saturating_add(delta);
        entry.value = CacheValue::Integer(next);
        if let Some(ttl) = ttl_seconds {
            if ttl > 0 {
                entry.reset_ttl(ttl, now);
            }
        }
        entry.touch(now);
        self.recency.promote(key);
        Ok(next)
    }

    // == Flush ==
    /// Empties the pool. Returns the number of entries removed.
    pub fn flush(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.insertion.clear();
        self.recency.clear();
        self.stats.record_evictions(removed as u64);
        self.stats.set_total_entries(0);
        removed
    }

    // == Status ==
    /// Snapshot of the orderings. Performs no expiry and no touches.
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            items: self.entries.len(),
            oldest: self.insertion.front().map(str::to_string),
            newest: self.insertion.back().map(str::to_string),
            least_recently_used: self.recency.front().map(str::to_string),
        }
    }

    // == Item Count ==
    /// Current number of entries, expired-but-unswept ones included.
    pub fn item_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Clear Stale ==
    /// Removes every expired entry. Returns the number removed.
    pub fn clear_stale(&mut self, now: Instant) -> usize {
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.remove_entry(key);
        }

        self.stats.record_expirations(stale.len() as u64);
        self.stats.set_total_entries(self.entries.len());
        stale.len()
    }

    // == Clear LRU ==
    /// Removes the least recently used half of the pool: floor(n/2)
    /// entries starting from the LRU end. Returns the number removed.
    pub fn clear_least_recently_used(&mut self) -> usize {
        let target = self.entries.len() / 2;
        let mut removed = 0;
        while removed < target {
            let Some(key) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&key);
            self.insertion.remove(&key);
            removed += 1;
        }
        self.stats.record_evictions(removed as u64);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current activity counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Internal ==
    /// Stores an entry and maintains both indices.
    fn insert_entry(&mut self, key: &str, value: CacheValue, ttl_seconds: u64, now: Instant) {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl_seconds, now));
        self.insertion.push_back(key);
        self.recency.promote(key);
        self.stats.set_total_entries(self.entries.len());
    }

    /// Lazily discards a dead entry for `key`. Returns true if one was
    /// discarded.
    fn discard_if_expired(&mut self, key: &str, now: Instant) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));
        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        expired
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.insertion.remove(key);
        self.recency.remove(key);
    }

    /// Test-only: asserts that the map and both indices agree as key sets.
    #[cfg(test)]
    pub(crate) fn check_indices(&self) {
        assert_eq!(self.entries.len(), self.insertion.len());
        assert_eq!(self.entries.len(), self.recency.len());
        for key in self.entries.keys() {
            assert!(self.insertion.contains(key), "insertion missing {key}");
            assert!(self.recency.contains(key), "recency missing {key}");
        }
    }
}
