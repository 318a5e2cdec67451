//! Quiz content and local progression
//!
//! [`config`] holds the question and settings types received from the
//! remote authority; [`run`] walks a single participant through them.

pub mod config;
pub mod run;
