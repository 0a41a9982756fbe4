//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the pool's structural invariants over random
//! operation sequences.

use proptest::prelude::*;
use std::time::{Duration, Instant};

use crate::cache::{CachePool, CacheValue};

// == Strategies ==
/// Generates cache keys from a small alphabet so sequences collide often.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e][0-9]{0,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = CacheValue> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,32}".prop_map(CacheValue::String),
        (-1_000_000i64..1_000_000).prop_map(CacheValue::Integer),
        any::<bool>().prop_map(CacheValue::Boolean),
    ]
}

/// A single pool operation for sequence testing.
#[derive(Debug, Clone)]
enum PoolOp {
    Add { key: String, value: CacheValue, ttl: u64 },
    Set { key: String, value: CacheValue, ttl: u64 },
    Replace { key: String, value: CacheValue },
    Get { key: String },
    Has { key: String },
    Delete { key: String },
    Increment { key: String },
    Decrement { key: String },
    Flush,
    ClearLru,
}

fn pool_op_strategy() -> impl Strategy<Value = PoolOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), 0u64..100)
            .prop_map(|(key, value, ttl)| PoolOp::Add { key, value, ttl }),
        (key_strategy(), value_strategy(), 0u64..100)
            .prop_map(|(key, value, ttl)| PoolOp::Set { key, value, ttl }),
        (key_strategy(), value_strategy())
            .prop_map(|(key, value)| PoolOp::Replace { key, value }),
        key_strategy().prop_map(|key| PoolOp::Get { key }),
        key_strategy().prop_map(|key| PoolOp::Has { key }),
        key_strategy().prop_map(|key| PoolOp::Delete { key }),
        key_strategy().prop_map(|key| PoolOp::Increment { key }),
        key_strategy().prop_map(|key| PoolOp::Decrement { key }),
        Just(PoolOp::Flush),
        Just(PoolOp::ClearLru),
    ]
}

fn apply(pool: &mut CachePool, op: PoolOp, now: Instant) {
    match op {
        PoolOp::Add { key, value, ttl } => {
            let _ = pool.add(&key, value, ttl, now);
        }
        PoolOp::Set { key, value, ttl } => pool.set(&key, value, ttl, now),
        PoolOp::Replace { key, value } => {
            let _ = pool.replace(&key, value, 0, now);
        }
        PoolOp::Get { key } => {
            let _ = pool.get(&key, now);
        }
        PoolOp::Has { key } => {
            let _ = pool.has(&key, now);
        }
        PoolOp::Delete { key } => {
            let _ = pool.delete(&key, now);
        }
        PoolOp::Increment { key } => {
            let _ = pool.increment(&key, None, now);
        }
        PoolOp::Decrement { key } => {
            let _ = pool.decrement(&key, None, now);
        }
        PoolOp::Flush => {
            pool.flush();
        }
        PoolOp::ClearLru => {
            pool.clear_least_recently_used();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For all operation sequences, the key set of the map, the insertion
    // index and the recency index stay identical, and item_count agrees.
    #[test]
    fn prop_indices_stay_consistent(ops in prop::collection::vec(pool_op_strategy(), 1..60)) {
        let now = Instant::now();
        let mut pool = CachePool::new();

        for op in ops {
            apply(&mut pool, op, now);
            pool.check_indices();
        }
    }

    // set(k, v, 0) followed by get(k) returns v for any permitted value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let now = Instant::now();
        let mut pool = CachePool::new();

        pool.set(&key, value.clone(), 0, now);
        prop_assert_eq!(pool.get(&key, now).unwrap(), value);
    }

    // set with a positive TTL is a MISS once the TTL has fully elapsed.
    #[test]
    fn prop_ttl_expiry(key in key_strategy(), value in value_strategy(), ttl in 1u64..3600) {
        let t0 = Instant::now();
        let mut pool = CachePool::new();

        pool.set(&key, value, ttl, t0);
        let after = t0 + Duration::from_secs(ttl) + Duration::from_millis(1);
        prop_assert!(pool.get(&key, after).is_err());
        prop_assert_eq!(pool.item_count(), 0);
    }

    // A second add on a live key fails and leaves the first value in place.
    #[test]
    fn prop_add_does_not_overwrite(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let now = Instant::now();
        let mut pool = CachePool::new();

        pool.add(&key, first.clone(), 0, now).unwrap();
        prop_assert!(pool.add(&key, second, 0, now).is_err());
        prop_assert_eq!(pool.get(&key, now).unwrap(), first);
    }

    // increment then decrement restores the original integer value
    // (away from the saturation bounds).
    #[test]
    fn prop_increment_decrement_inverse(key in key_strategy(), v in -1_000_000i64..1_000_000) {
        let now = Instant::now();
        let mut pool = CachePool::new();

        pool.set(&key, CacheValue::Integer(v), 0, now);
        pool.increment(&key, None, now).unwrap();
        let restored = pool.decrement(&key, None, now).unwrap();
        prop_assert_eq!(restored, v);
        prop_assert_eq!(pool.get(&key, now).unwrap(), CacheValue::Integer(v));
    }

    // clear_stale is idempotent: a second sweep at the same instant
    // removes nothing.
    #[test]
    fn prop_clear_stale_idempotent(
        entries in prop::collection::vec((key_strategy(), value_strategy(), 0u64..10), 1..20),
        elapsed in 0u64..15
    ) {
        let t0 = Instant::now();
        let mut pool = CachePool::new();

        for (key, value, ttl) in entries {
            pool.set(&key, value, ttl, t0);
        }

        let later = t0 + Duration::from_secs(elapsed);
        pool.clear_stale(later);
        prop_assert_eq!(pool.clear_stale(later), 0);
        pool.check_indices();
    }

    // clear_least_recently_used never removes the most recently used key
    // when the pool holds at least two entries.
    #[test]
    fn prop_lru_eviction_spares_mru(
        keys in prop::collection::hash_set("[a-z]{1,6}", 2..20)
    ) {
        let now = Instant::now();
        let mut pool = CachePool::new();

        let keys: Vec<String> = keys.into_iter().collect();
        for key in &keys {
            pool.set(key, CacheValue::Integer(1), 0, now);
        }

        let mru = keys.last().unwrap().clone();
        pool.get(&mru, now).unwrap();

        let before = pool.item_count();
        let removed = pool.clear_least_recently_used();
        prop_assert_eq!(removed, before / 2);
        prop_assert!(pool.has(&mru, now));
        pool.check_indices();
    }
}
