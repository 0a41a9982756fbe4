//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors surfaced by pool operations. The dispatcher maps these to the
/// protocol's reply tokens.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not present in the pool
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key present but its TTL has elapsed
    #[error("Key expired: {0}")]
    Expired(String),

    /// `add` against a live key
    #[error("Key already exists: {0}")]
    KeyExists(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
