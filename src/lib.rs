//! # QuizForge Client Core
//!
//! This library holds the state machine for one participant of a live quiz
//! room. It reconciles room snapshots pushed by a remote authority, routes
//! between the home, lobby and quiz screens, validates host and player
//! intents, and drives the timed question-to-question progression locally.
//!
//! The crate performs no I/O. Outbound intents go through a
//! [`session::Transport`], timers are requested through a `schedule_alarm`
//! callback, and the embedding runtime hands inbound messages and due
//! alarms back to a [`client::Client`].

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_field_names)]

pub mod client;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod leaderboard;
pub mod message;
mod names;
pub mod participant;
pub mod quiz;
pub mod reconciler;
pub mod room_code;
pub mod router;
pub mod session;
