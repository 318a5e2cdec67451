//! Room code handling
//!
//! A room code identifies a shared session. The remote authority mints
//! it; participants type it in to join. Codes are treated as opaque text,
//! but surrounding whitespace from user input is discarded.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The identifier of a shared session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

/// Errors produced while parsing a room code typed by a user
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The code is empty or consists only of whitespace
    #[error("room code cannot be empty")]
    Empty,
}

impl RoomCode {
    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RoomCode {
    type Err = Error;

    /// Parses a room code from user input
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if nothing remains after trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(Error::Empty)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }
}
