//! Reply Formatting Module
//!
//! Renders dispatch outcomes as the single-line wire tokens.

use std::fmt;

use crate::cache::{CacheValue, PoolStatus};
use crate::protocol::ParseError;

// == Reply ==
/// One reply line, written to the client followed by a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Operation succeeded
    Ok,
    /// The key was absent or dead
    Miss,
    /// `add` hit a live key
    Exists,
    /// A stored value, rendered by type
    Value(CacheValue),
    /// A counter result
    Integer(i64),
    /// A `has` result
    Boolean(bool),
    /// A removal count (`flush`)
    Count(usize),
    /// The `status` snapshot
    Status(PoolStatus),
    /// A request line that failed to parse
    Error(ParseError),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("OK"),
            Reply::Miss => f.write_str("MISS"),
            Reply::Exists => f.write_str("EXISTS"),
            Reply::Value(value) => write!(f, "{}", value),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Reply::Count(n) => write!(f, "{}", n),
            Reply::Status(status) => write!(f, "{}", status),
            Reply::Error(err) => write!(f, "{}", err),
        }
    }
}

impl From<ParseError> for Reply {
    fn from(err: ParseError) -> Self {
        Reply::Error(err)
    }
}
