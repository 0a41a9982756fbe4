//! Housekeeping Tick Task
//!
//! Background task that fires every five seconds to expire stale entries
//! and enforce the memory budget: at the soft limit the least recently used
//! half of the pool is dropped, at the hard limit everything is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CachePool;
use crate::config::Config;
use crate::tasks::memory::MemoryMonitor;

/// Interval between housekeeping ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

// == Memory Policy ==
/// The two eviction thresholds, in bytes of process RSS.
#[derive(Debug, Clone, Copy)]
pub struct MemoryPolicy {
    /// At or above this, the LRU half of the pool is dropped
    pub soft_limit_bytes: u64,
    /// At or above this, the pool is flushed
    pub hard_limit_bytes: u64,
}

impl MemoryPolicy {
    /// Derives the thresholds from the configured memory limit.
    pub fn from_config(config: &Config) -> Self {
        Self {
            soft_limit_bytes: config.soft_limit_bytes(),
            hard_limit_bytes: config.hard_limit_bytes(),
        }
    }
}

// == Tick Task ==
/// Spawns the periodic housekeeping task.
///
/// The interval is scheduled from the previous fire time, so a slow tick
/// does not drift the schedule. The returned handle can be aborted during
/// shutdown.
pub fn spawn_tick_task(pool: Arc<RwLock<CachePool>>, policy: MemoryPolicy) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting housekeeping tick every {}s (soft limit {} bytes, hard limit {} bytes)",
            TICK_INTERVAL.as_secs(),
            policy.soft_limit_bytes,
            policy.hard_limit_bytes
        );

        let mut monitor = MemoryMonitor::new();
        if monitor.is_none() {
            warn!("Process memory usage unavailable; memory limits are not enforced");
        }

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        // The first tick of a tokio interval completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_tick(&pool, policy, monitor.as_mut()).await;
        }
    })
}

/// One housekeeping pass. A tick holds the pool lock for its whole body, so
/// it is linearized against client commands.
pub(crate) async fn run_tick(
    pool: &Arc<RwLock<CachePool>>,
    policy: MemoryPolicy,
    monitor: Option<&mut MemoryMonitor>,
) {
    let usage = monitor.and_then(|m| m.rss_bytes());
    let mut pool = pool.write().await;

    if let Some(usage) = usage {
        if usage >= policy.hard_limit_bytes {
            let flushed = pool.flush();
            info!(
                "Memory usage {} bytes reached the hard limit; flushed {} entries",
                usage, flushed
            );
        } else if usage >= policy.soft_limit_bytes {
            let evicted = pool.clear_least_recently_used();
            info!(
                "Memory usage {} bytes reached the soft limit; evicted {} LRU entries",
                usage, evicted
            );
        }
    }

    let expired = pool.clear_stale(Instant::now());
    if expired > 0 {
        info!("Housekeeping: removed {} expired entries", expired);
    }

    match usage {
        Some(usage) => debug!(
            "Tick complete: usage={} bytes, items={}",
            usage,
            pool.item_count()
        ),
        None => debug!("Tick complete: usage=unknown, items={}", pool.item_count()),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheValue;

    fn unlimited() -> MemoryPolicy {
        MemoryPolicy {
            soft_limit_bytes: u64::MAX,
            hard_limit_bytes: u64::MAX,
        }
    }

    async fn seeded_pool(keys: &[&str]) -> Arc<RwLock<CachePool>> {
        let pool = Arc::new(RwLock::new(CachePool::new()));
        {
            let mut guard = pool.write().await;
            let now = Instant::now();
            for key in keys {
                guard.set(key, CacheValue::Integer(1), 0, now);
            }
        }
        pool
    }

    #[tokio::test]
    async fn test_tick_removes_expired_entries() {
        let pool = Arc::new(RwLock::new(CachePool::new()));
        {
            let mut guard = pool.write().await;
            guard.set("expire_soon", CacheValue::Integer(1), 1, Instant::now());
            guard.set("long_lived", CacheValue::Integer(2), 3600, Instant::now());
        }

        tokio::time::sleep(Duration::from_millis(1100)).await;
        run_tick(&pool, unlimited(), None).await;

        let guard = pool.read().await;
        assert_eq!(guard.item_count(), 1);
    }

    #[tokio::test]
    async fn test_tick_soft_limit_drops_lru_half() {
        let pool = seeded_pool(&["a", "b", "c", "d"]).await;
        let policy = MemoryPolicy {
            soft_limit_bytes: 0,
            hard_limit_bytes: u64::MAX,
        };

        let mut monitor = MemoryMonitor::new();
        run_tick(&pool, policy, monitor.as_mut()).await;

        let guard = pool.read().await;
        assert_eq!(guard.item_count(), 2);
    }

    #[tokio::test]
    async fn test_tick_hard_limit_flushes() {
        let pool = seeded_pool(&["a", "b", "c"]).await;
        let policy = MemoryPolicy {
            soft_limit_bytes: 0,
            hard_limit_bytes: 0,
        };

        let mut monitor = MemoryMonitor::new();
        run_tick(&pool, policy, monitor.as_mut()).await;

        let guard = pool.read().await;
        assert!(guard.is_empty());
    }

    #[tokio::test]
    async fn test_tick_without_monitor_skips_eviction() {
        let pool = seeded_pool(&["a", "b", "c", "d"]).await;
        let policy = MemoryPolicy {
            soft_limit_bytes: 0,
            hard_limit_bytes: 0,
        };

        run_tick(&pool, policy, None).await;

        // No usage sample, so neither eviction tier fires
        let guard = pool.read().await;
        assert_eq!(guard.item_count(), 4);
    }

    #[tokio::test]
    async fn test_tick_task_can_be_aborted() {
        let pool = Arc::new(RwLock::new(CachePool::new()));
        let handle = spawn_tick_task(pool, unlimited());

        handle.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
