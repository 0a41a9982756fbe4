//! Configuration Module
//!
//! Startup options supplied on the command line, with sensible defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

// == Config ==
/// Server configuration parameters.
#[derive(Debug, Clone, Parser)]
#[command(name = "minicached")]
#[command(about = "Volatile in-memory key-value cache server")]
pub struct Config {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// TCP port to listen on
    #[arg(long, default_value_t = 11311)]
    pub port: u16,

    /// Memory limit in MiB; reaching it flushes the cache, reaching 75% of
    /// it evicts the least recently used half
    #[arg(long = "memorylimit", default_value_t = 64)]
    pub memory_limit_mib: u64,

    /// Log verbosity, 0 (errors only) through 3 (trace)
    #[arg(long, default_value_t = 1)]
    pub verbosity: u8,
}

impl Config {
    // == Bind Address ==
    /// The socket address to listen on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    // == Memory Limits ==
    /// Hard cap in bytes: the configured limit in MiB.
    pub fn hard_limit_bytes(&self) -> u64 {
        self.memory_limit_mib * 1024 * 1024
    }

    /// Soft cap in bytes: 75% of the hard cap.
    pub fn soft_limit_bytes(&self) -> u64 {
        self.hard_limit_bytes() / 4 * 3
    }

    // == Log Filter ==
    /// The tracing filter directive for the configured verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 11311,
            memory_limit_mib: 64,
            verbosity: 1,
        }
    }
}
