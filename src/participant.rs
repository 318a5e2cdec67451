//! Participant identity and membership data
//!
//! Participants are assigned opaque identifiers by the remote authority.
//! This module wraps those identifiers and describes the per-participant
//! record that room snapshots and leaderboard pushes carry.

use serde::{Deserialize, Serialize};

/// An opaque, collaborator-assigned participant identifier
///
/// The identifier is stable for the lifetime of the participant's
/// connection. Nothing in this crate interprets its contents.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Id(String);

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Id {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A joined user as reported by the remote authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque identifier, unique within a room
    pub id: Id,
    /// Display name chosen at join time
    pub username: String,
    /// Accumulated points for the current session
    #[serde(default)]
    pub score: u64,
}

impl Participant {
    /// Creates a participant record
    pub fn new(id: impl Into<Id>, username: impl Into<String>, score: u64) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            score,
        }
    }
}
