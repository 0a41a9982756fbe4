//! Wire Protocol Module
//!
//! The line-framed textual protocol: request parsing and reply rendering.
//! One newline-terminated request line maps to one newline-terminated reply
//! line.

pub mod command;
pub mod reply;

// Re-export commonly used types
pub use command::{Command, ParseError};
pub use reply::Reply;
