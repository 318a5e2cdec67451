//! Client options supplied by the embedding application

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{constants, quiz::config::Settings};

fn default_max_username_length() -> usize {
    constants::username::DEFAULT_MAX_LENGTH
}

/// Tunables for a [`Client`](crate::client::Client)
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Longest accepted username, in characters
    #[serde(default = "default_max_username_length")]
    #[garde(range(min = 1, max = constants::username::MAX_CONFIGURABLE_LENGTH))]
    pub max_username_length: usize,
    /// Initial values of the host's quiz controls, and the settings used
    /// when a game starts without any
    #[serde(default)]
    #[garde(dive)]
    pub default_settings: Settings,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_username_length: default_max_username_length(),
            default_settings: Settings::default(),
        }
    }
}
