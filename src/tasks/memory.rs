//! Process Memory Module
//!
//! Samples the server's resident set size for the eviction policy. The
//! policy compares real process usage, not an internal byte estimate.

use sysinfo::{Pid, System};

// == Memory Monitor ==
/// Wraps a sysinfo [`System`] scoped to the current process.
pub struct MemoryMonitor {
    system: System,
    pid: Pid,
}

impl MemoryMonitor {
    /// Creates a monitor for the current process.
    ///
    /// Returns None when the current process id cannot be determined.
    pub fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        Some(Self {
            system: System::new(),
            pid,
        })
    }

    /// Current RSS in bytes, or None when the process cannot be sampled.
    pub fn rss_bytes(&mut self) -> Option<u64> {
        if !self.system.refresh_process(self.pid) {
            return None;
        }
        self.system.process(self.pid).map(|process| process.memory())
    }
}
