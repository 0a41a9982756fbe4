//! Command Parsing Module
//!
//! Classifies a request line into a command with validated arguments.
//!
//! Command verbs match case-insensitively; keys are case-sensitive. Values
//! for the storage commands carry an optional one-letter type tag
//! (`s|`, `i|`, `b|`, default `s`) and may contain spaces; a final all-digit
//! token after the value is its TTL in seconds.

use thiserror::Error;

use crate::cache::{CacheValue, TypeTag, MAX_KEY_LENGTH};

// == Parse Error ==
/// A request line that does not form a valid command.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The command verb is not recognized
    #[error("Invalid command")]
    UnknownCommand,

    /// The verb is known but its arguments do not match the grammar
    #[error("Invalid arguments")]
    InvalidArguments,
}

// == Command ==
/// One parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        key: String,
        value: CacheValue,
        ttl_seconds: u64,
    },
    Set {
        key: String,
        value: CacheValue,
        ttl_seconds: u64,
    },
    Replace {
        key: String,
        value: CacheValue,
        ttl_seconds: u64,
    },
    Get {
        key: String,
    },
    Has {
        key: String,
    },
    Delete {
        key: String,
    },
    Increment {
        key: String,
        ttl_seconds: Option<u64>,
    },
    Decrement {
        key: String,
        ttl_seconds: Option<u64>,
    },
    Flush,
    Status,
    Close,
}

impl Command {
    // == Parse ==
    /// Parses one logical request line (already stripped of its newline).
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::UnknownCommand);
        }

        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, rest),
            None => (line, ""),
        };

        let command = match () {
            _ if verb.eq_ignore_ascii_case("add") => {
                let (key, value, ttl_seconds) = parse_storage_args(rest)?;
                Command::Add {
                    key,
                    value,
                    ttl_seconds,
                }
            }
            _ if verb.eq_ignore_ascii_case("set") => {
                let (key, value, ttl_seconds) = parse_storage_args(rest)?;
                Command::Set {
                    key,
                    value,
                    ttl_seconds,
                }
            }
            _ if verb.eq_ignore_ascii_case("replace") => {
                let (key, value, ttl_seconds) = parse_storage_args(rest)?;
                Command::Replace {
                    key,
                    value,
                    ttl_seconds,
                }
            }
            _ if verb.eq_ignore_ascii_case("get") => Command::Get {
                key: parse_key_only(rest)?,
            },
            _ if verb.eq_ignore_ascii_case("has") => Command::Has {
                key: parse_key_only(rest)?,
            },
            _ if verb.eq_ignore_ascii_case("delete") => Command::Delete {
                key: parse_key_only(rest)?,
            },
            _ if verb.eq_ignore_ascii_case("increment") => {
                let (key, ttl_seconds) = parse_counter_args(rest)?;
                Command::Increment { key, ttl_seconds }
            }
            _ if verb.eq_ignore_ascii_case("decrement") => {
                let (key, ttl_seconds) = parse_counter_args(rest)?;
                Command::Decrement { key, ttl_seconds }
            }
            _ if verb.eq_ignore_ascii_case("flush") => {
                ensure_bare(rest)?;
                Command::Flush
            }
            _ if verb.eq_ignore_ascii_case("status") => {
                ensure_bare(rest)?;
                Command::Status
            }
            _ if verb.eq_ignore_ascii_case("close") => {
                ensure_bare(rest)?;
                Command::Close
            }
            _ => return Err(ParseError::UnknownCommand),
        };

        Ok(command)
    }
}

// == Argument Parsing ==
/// `<key> [s|b|i|]<value> [<ttl>]` for add/set/replace.
fn parse_storage_args(rest: &str) -> Result<(String, CacheValue, u64), ParseError> {
    let (key, value_part) = rest.split_once(' ').ok_or(ParseError::InvalidArguments)?;
    let key = validate_key(key)?;

    let (value_text, ttl) = split_trailing_ttl(value_part);
    let (tag, raw) = split_type_tag(value_text);
    if raw.is_empty() {
        return Err(ParseError::InvalidArguments);
    }

    Ok((
        key.to_string(),
        CacheValue::from_tagged(tag, raw),
        ttl.unwrap_or(0),
    ))
}

/// `<key>` for get/has/delete.
fn parse_key_only(rest: &str) -> Result<String, ParseError> {
    Ok(validate_key(rest)?.to_string())
}

/// `<key> [<ttl>]` for increment/decrement.
fn parse_counter_args(rest: &str) -> Result<(String, Option<u64>), ParseError> {
    match rest.split_once(' ') {
        None => Ok((validate_key(rest)?.to_string(), None)),
        Some((key, ttl_text)) => {
            let key = validate_key(key)?;
            if !is_digits(ttl_text) {
                return Err(ParseError::InvalidArguments);
            }
            let ttl = ttl_text
                .parse()
                .map_err(|_| ParseError::InvalidArguments)?;
            Ok((key.to_string(), Some(ttl)))
        }
    }
}

fn ensure_bare(rest: &str) -> Result<(), ParseError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ParseError::InvalidArguments)
    }
}

fn validate_key(key: &str) -> Result<&str, ParseError> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH || key.contains(' ') {
        return Err(ParseError::InvalidArguments);
    }
    Ok(key)
}

/// Splits an optional trailing TTL off the value text. The last token is a
/// TTL only when it is all digits and at least one value token precedes it;
/// otherwise the whole text is the value.
fn split_trailing_ttl(text: &str) -> (&str, Option<u64>) {
    if let Some((head, last)) = text.rsplit_once(' ') {
        if !head.is_empty() && is_digits(last) {
            if let Ok(ttl) = last.parse::<u64>() {
                return (head, Some(ttl));
            }
        }
    }
    (text, None)
}

/// Consumes a leading `s|`/`i|`/`b|` type tag; the default type is `s`.
fn split_type_tag(text: &str) -> (TypeTag, &str) {
    if let Some(raw) = text.strip_prefix("s|") {
        (TypeTag::Str, raw)
    } else if let Some(raw) = text.strip_prefix("i|") {
        (TypeTag::Int, raw)
    } else if let Some(raw) = text.strip_prefix("b|") {
        (TypeTag::Bool, raw)
    } else {
        (TypeTag::Str, text)
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
