//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use crate::cache::CacheValue;

// == Cache Entry ==
/// A single cached value plus its metadata.
///
/// All timestamps are monotonic and supplied by the caller, which keeps
/// expiry checks deterministic under test.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value (the variant carries the type tag)
    pub value: CacheValue,
    /// Monotonic timestamp at creation; also the start of the TTL window
    pub inserted_at: Instant,
    /// Monotonic timestamp of the last successful read or mutation
    pub last_accessed_at: Instant,
    /// TTL in seconds, 0 = never expires
    pub ttl_seconds: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - TTL in seconds, 0 for no expiry
    /// * `now` - Current monotonic time
    pub fn new(value: CacheValue, ttl_seconds: u64, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            last_accessed_at: now,
            ttl_seconds,
        }
    }

    // == Touch ==
    /// Records an access, updating `last_accessed_at`.
    pub fn touch(&mut self, now: Instant) {
        self.last_accessed_at = now;
    }

    // == Reset TTL ==
    /// Restarts the expiry window from `now` with a new TTL.
    pub fn reset_ttl(&mut self, ttl_seconds: u64, now: Instant) {
        self.ttl_seconds = ttl_seconds;
        self.inserted_at = now;
    }

    // == Is Expired ==
    /// Checks whether the entry is dead at `now`.
    ///
    /// Boundary condition: an entry with a TTL is expired once the full TTL
    /// duration has elapsed, i.e. `now - inserted_at >= ttl_seconds`. A TTL
    /// of 0 never expires.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.ttl_seconds > 0
            && now.duration_since(self.inserted_at) >= Duration::from_secs(self.ttl_seconds)
    }

    // == Remaining TTL ==
    /// Returns the remaining lifetime at `now`, or None for entries without
    /// a TTL.
    pub fn ttl_remaining(&self, now: Instant) -> Option<Duration> {
        if self.ttl_seconds == 0 {
            return None;
        }
        let deadline = self.inserted_at + Duration::from_secs(self.ttl_seconds);
        Some(deadline.saturating_duration_since(now))
    }
}
