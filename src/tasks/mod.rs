//! Background Tasks Module
//!
//! Periodic housekeeping that runs alongside connection handling: TTL
//! expiry sweeps and the two-tier memory eviction policy.

pub mod memory;
mod ticker;

pub use memory::MemoryMonitor;
pub use ticker::{spawn_tick_task, MemoryPolicy, TICK_INTERVAL};
