//! Command Dispatch
//!
//! Pure glue between parsed commands and pool operations: each verb invokes
//! its pool operation and the outcome becomes a reply line.

use std::time::Instant;

use crate::cache::CachePool;
use crate::error::CacheError;
use crate::protocol::{Command, Reply};

/// Executes one command against the pool.
///
/// `Close` never reaches this function: the connection layer intercepts it
/// before dispatch because it terminates the connection rather than the
/// request.
pub fn execute(command: Command, pool: &mut CachePool, now: Instant) -> Reply {
    match command {
        Command::Add {
            key,
            value,
            ttl_seconds,
        } => match pool.add(&key, value, ttl_seconds, now) {
            Ok(()) => Reply::Ok,
            Err(CacheError::KeyExists(_)) => Reply::Exists,
            Err(_) => Reply::Miss,
        },
        Command::Set {
            key,
            value,
            ttl_seconds,
        } => {
            pool.set(&key, value, ttl_seconds, now);
            Reply::Ok
        }
        Command::Replace {
            key,
            value,
            ttl_seconds,
        } => match pool.replace(&key, value, ttl_seconds, now) {
            Ok(()) => Reply::Ok,
            Err(_) => Reply::Miss,
        },
        Command::Get { key } => match pool.get(&key, now) {
            Ok(value) => Reply::Value(value),
            Err(_) => Reply::Miss,
        },
        Command::Has { key } => Reply::Boolean(pool.has(&key, now)),
        Command::Delete { key } => match pool.delete(&key, now) {
            Ok(()) => Reply::Ok,
            Err(_) => Reply::Miss,
        },
        Command::Increment { key, ttl_seconds } => {
            match pool.increment(&key, ttl_seconds, now) {
                Ok(value) => Reply::Integer(value),
                Err(_) => Reply::Miss,
            }
        }
        Command::Decrement { key, ttl_seconds } => {
            match pool.decrement(&key, ttl_seconds, now) {
                Ok(value) => Reply::Integer(value),
                Err(_) => Reply::Miss,
            }
        }
        Command::Flush => Reply::Count(pool.flush()),
        Command::Status => Reply::Status(pool.status()),
        Command::Close => Reply::Ok,
    }
}
