//! minicached - a volatile in-memory key-value cache server
//!
//! Speaks a newline-delimited text protocol over TCP, with TTL expiry and
//! two-tier LRU/flush eviction under memory pressure.

pub mod cache;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tasks;

pub use config::Config;
pub use server::CacheServer;
pub use tasks::spawn_tick_task;
