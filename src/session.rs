//! Session data and the outbound transport seam
//!
//! This module defines the locally reconciled view of a room and the
//! trait through which every outbound intent leaves the crate. Nothing
//! here talks to a network directly; the embedding application supplies a
//! [`Transport`] implementation (WebSocket, Socket.IO bridge, in-memory
//! channel for tests).

use serde::Serialize;

use super::{
    message::OutgoingMessage,
    participant::{Id, Participant},
    room_code::RoomCode,
};

/// Trait for sending intents to the remote authority
///
/// Implementations decide how messages are framed and delivered. The client
/// never retries; delivery failures for quiz generation are reported back
/// through [`Client::generation_failed`](crate::client::Client::generation_failed).
pub trait Transport {
    /// Sends an intent to the remote authority
    ///
    /// # Arguments
    ///
    /// * `message` - The intent to deliver
    fn send(&self, message: &OutgoingMessage);

    /// Closes the transport
    ///
    /// Called once when the owning session context is torn down.
    fn close(self);
}

/// Where a room is in its lifetime, as seen by this participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Lifecycle {
    /// Participants are gathering
    #[default]
    Lobby,
    /// The host asked for a quiz and the generator is working
    QuizGenerating,
    /// A quiz is available and the host may start
    QuizReady,
    /// Questions are being played
    InQuiz,
    /// The last question has closed
    Ended,
}

/// The local view of a shared room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// The room this session belongs to
    pub room_code: RoomCode,
    /// Participants in the order the remote authority listed them
    pub participants: Vec<Participant>,
    /// The participant with host privileges
    pub host_id: Id,
    /// Current phase of the room
    pub lifecycle: Lifecycle,
}

impl Session {
    /// Whether `id` is this room's host
    pub fn is_host(&self, id: &Id) -> bool {
        &self.host_id == id
    }

    /// Looks up a participant by id
    pub fn participant(&self, id: &Id) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Replaces the participant list, never letting a known participant's
    /// score go down
    ///
    /// The incoming list is authoritative for membership and order. For an
    /// id already present, the higher of the local and incoming score is
    /// kept so a reordered push cannot roll a score back.
    pub fn replace_participants(&mut self, incoming: Vec<Participant>) {
        let participants: Vec<Participant> = incoming
            .into_iter()
            .map(|mut participant| {
                if let Some(known) = self.participant(&participant.id) {
                    participant.score = participant.score.max(known.score);
                }
                participant
            })
            .collect();
        self.participants = participants;
    }
}
