//! Username validation
//!
//! Usernames are typed freely by participants before they create or join a
//! room. They are normalized and checked locally so that an empty or
//! oversized name never reaches the remote authority.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while validating a username
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name exceeds the configured maximum length
    #[error("name is too long")]
    TooLong,
}

/// Normalizes and validates a username
///
/// Leading and trailing whitespace (including the invisible characters
/// `rustrict` knows about) is removed before checking.
///
/// # Arguments
///
/// * `name` - The raw name as typed
/// * `max_length` - Maximum allowed length in characters after trimming
///
/// # Returns
///
/// The cleaned name on success.
///
/// # Errors
///
/// * `Error::Empty` - Nothing remains after trimming whitespace
/// * `Error::TooLong` - The trimmed name has more than `max_length` characters
pub fn validate_username(name: &str, max_length: usize) -> Result<String, Error> {
    let name = rustrict::trim_whitespace(name);
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.chars().count() > max_length {
        return Err(Error::TooLong);
    }
    Ok(name.to_owned())
}
