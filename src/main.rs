//! minicached - a volatile in-memory key-value cache server
//!
//! Speaks a newline-delimited text protocol over TCP, with TTL expiry and
//! two-tier LRU/flush eviction under memory pressure.
//!
//! # Startup Sequence
//! 1. Parse command-line configuration
//! 2. Initialize tracing subscriber at the configured verbosity
//! 3. Create the cache pool
//! 4. Start the background housekeeping tick
//! 5. Bind the TCP listener and serve connections
//! 6. Handle graceful shutdown on SIGINT/SIGTERM

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minicached::cache::{CachePool, POOL_NAME};
use minicached::config::Config;
use minicached::server::CacheServer;
use minicached::tasks::{spawn_tick_task, MemoryPolicy};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize tracing subscriber; RUST_LOG overrides the verbosity option
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting minicached cache server");
    info!(
        "Configuration loaded: host={}, port={}, memorylimit={}MiB, verbosity={}",
        config.host, config.port, config.memory_limit_mib, config.verbosity
    );

    let pool = Arc::new(RwLock::new(CachePool::new()));
    info!("Cache pool '{}' initialized", POOL_NAME);

    let tick_handle = spawn_tick_task(pool.clone(), MemoryPolicy::from_config(&config));

    let server = match CacheServer::bind(config.bind_addr(), pool).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr(), e);
            tick_handle.abort();
            return ExitCode::FAILURE;
        }
    };
    info!("Server listening on {}", config.bind_addr());

    // Serve until a shutdown signal arrives; the cache is volatile, so
    // there is nothing to drain
    let outcome = tokio::select! {
        result = server.serve() => result,
        _ = shutdown_signal() => Ok(()),
    };

    tick_handle.abort();
    warn!("Housekeeping task aborted");

    match outcome {
        Ok(()) => {
            info!("Server shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
