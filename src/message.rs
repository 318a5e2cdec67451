//! Wire messages exchanged with the remote authority
//!
//! Inbound pushes and outbound intents are JSON objects tagged by an
//! `event` field carrying the kebab-case message name, with camelCase
//! payload fields flattened next to it:
//!
//! ```json
//! {"event":"submit-answer","roomCode":"AB12","questionIndex":0,"answerIndex":2,"timeTaken":4.2}
//! ```
//!
//! How these objects travel is up to the [`Transport`](crate::session::Transport).

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use web_time::Duration;

use crate::{
    participant::{Id, Participant},
    quiz::config::{Question, Settings},
    room_code::RoomCode,
};

/// Messages pushed by the remote authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum IncomingMessage {
    /// The connection is up and this participant has been assigned an id
    Connected(Connected),
    /// Full replace of room membership and host
    RoomSnapshot(RoomSnapshot),
    /// Membership changed without a full room snapshot
    UserListUpdate(UserList),
    /// The quiz generator finished
    QuizReady(QuizReady),
    /// The host started the game
    GameStarted(GameStarted),
    /// Scores changed
    LeaderboardUpdate(UserList),
    /// The remote authority rejected something
    Error(ErrorMessage),
}

/// Payload of [`IncomingMessage::Connected`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connected {
    /// The id the remote authority knows this participant by
    pub id: Id,
}

/// Payload of [`IncomingMessage::RoomSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// The room the snapshot describes
    pub room_code: RoomCode,
    /// The participant allowed to configure and start the quiz
    pub host_id: Id,
    /// Every participant currently in the room, in join order
    pub users: Vec<Participant>,
}

/// A bare participant list, used by membership and leaderboard pushes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    /// Every participant currently in the room
    pub users: Vec<Participant>,
}

fn generation_succeeded() -> bool {
    true
}

/// Payload of [`IncomingMessage::QuizReady`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReady {
    /// Whether generation succeeded; absent means it did
    #[serde(default = "generation_succeeded")]
    pub success: bool,
}

/// Payload of [`IncomingMessage::GameStarted`]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStarted {
    /// Questions in play order
    pub questions: Vec<Question>,
    /// The settings the quiz was generated with, if the authority sent them
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// Payload of [`IncomingMessage::Error`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Human readable description, shown verbatim
    pub message: String,
}

impl IncomingMessage {
    /// Parses an inbound JSON message
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the text is not a known message.
    pub fn from_message(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Where the quiz generator should take its material from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizSource {
    /// An uploaded document
    File {
        /// The file name as chosen by the host
        name: String,
        /// Raw file contents
        bytes: Vec<u8>,
    },
    /// Pasted notes
    Text(String),
}

/// Intents sent to the remote authority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum OutgoingMessage {
    /// Open a new room with this participant as host
    CreateSession(CreateSession),
    /// Enter an existing room
    JoinSession(JoinSession),
    /// Ask the generator for a quiz
    GenerateQuiz(GenerateQuiz),
    /// Begin the game for everyone in the room
    StartGame(StartGame),
    /// Answer the current question
    SubmitAnswer(SubmitAnswer),
}

/// Payload of [`OutgoingMessage::CreateSession`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSession {
    /// The host's display name
    pub username: String,
}

/// Payload of [`OutgoingMessage::JoinSession`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSession {
    /// The room to enter
    pub room_code: RoomCode,
    /// The participant's display name
    pub username: String,
}

/// Payload of [`OutgoingMessage::GenerateQuiz`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuiz {
    /// Material to build the quiz from
    pub source: QuizSource,
    /// Number of questions to generate
    pub question_count: usize,
    /// Seconds per question
    pub time_per_question: u64,
    /// The room the quiz is for
    pub room_code: RoomCode,
}

/// Payload of [`OutgoingMessage::StartGame`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGame {
    /// The room to start
    pub room_code: RoomCode,
}

/// Payload of [`OutgoingMessage::SubmitAnswer`]
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswer {
    /// The room being played
    pub room_code: RoomCode,
    /// 0-based index of the answered question
    pub question_index: usize,
    /// 0-based index of the chosen option
    pub answer_index: usize,
    /// Time between the question becoming active and the answer, in fractional seconds
    #[serde_as(as = "serde_with::DurationSecondsWithFrac<f64>")]
    pub time_taken: Duration,
}

impl OutgoingMessage {
    /// Converts the message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
