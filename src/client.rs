//! The participant's session context
//!
//! A [`Client`] owns everything one participant knows about their room:
//! the reconciled session, the active screen, the host controls and the
//! local quiz run. The embedding runtime feeds it inbound messages and
//! due alarms; user intents go out through the injected [`Transport`].
//!
//! All handlers take `&mut self`, so concurrent pushes and timer callbacks
//! are serialized by whoever owns the client.

use std::sync::Arc;

use derive_where::derive_where;
use garde::Validate;
use serde::Serialize;
use thiserror::Error;
use web_time::{Duration, Instant};

use crate::{
    config::Options,
    constants,
    countdown::Alarm,
    leaderboard::{self, Standing},
    message::{
        CreateSession, GameStarted, GenerateQuiz, IncomingMessage, JoinSession, OutgoingMessage,
        QuizSource, StartGame,
    },
    names,
    participant::{Id, Participant},
    quiz::{
        config::{Quiz, Settings},
        run::{Advance, QuizRun},
    },
    reconciler,
    room_code::RoomCode,
    router::{Router, Screen},
    session::{Lifecycle, Session, Transport},
};

/// Validation failures for user intents
///
/// The messages are shown to the participant as is.
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Creating a room without a username
    #[error("Please enter a username first!")]
    MissingUsername,
    /// Joining a room without a username or room code
    #[error("Please enter a username and a room code!")]
    MissingJoinDetails,
    /// The username exceeds the configured length
    #[error("Username is too long.")]
    UsernameTooLong,
    /// Requested question count outside the allowed bounds
    #[error(
        "Number of questions must be between {} and {}.",
        constants::quiz::MIN_QUESTION_COUNT,
        constants::quiz::MAX_QUESTION_COUNT
    )]
    QuestionCountOutOfRange,
    /// Requested time per question outside the allowed bounds
    #[error(
        "Time per question must be between {} and {} seconds.",
        constants::quiz::MIN_TIME_PER_QUESTION,
        constants::quiz::MAX_TIME_PER_QUESTION
    )]
    TimeOutOfRange,
    /// A file source without a file
    #[error("Please select a file first!")]
    MissingFile,
    /// A text source without text
    #[error("Please paste some text first!")]
    MissingText,
    /// A room action before any room is known
    #[error("Join or create a room first.")]
    NoSession,
    /// A lobby action after the game has started
    #[error("The game has already started.")]
    GameInProgress,
}

impl From<names::Error> for Error {
    fn from(error: names::Error) -> Self {
        match error {
            names::Error::Empty => Self::MissingUsername,
            names::Error::TooLong => Self::UsernameTooLong,
        }
    }
}

/// Whether a notification reports a problem or a success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    /// Something was rejected
    Error,
    /// Something finished
    Success,
}

/// The single transient message shown over the current screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Error or success
    pub kind: NotificationKind,
    /// Short heading
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notification {
    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Heads Up!".to_owned(),
            message: message.into(),
        }
    }

    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success!".to_owned(),
            message: message.into(),
        }
    }
}

/// What the presentation layer should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    /// Username entry with create and join actions
    Home,
    /// Room code, participant list and, for the host, quiz controls
    Lobby,
    /// The current question with its countdown, next to the live leaderboard
    Quiz,
    /// Final placement and leaderboard
    QuizEnded,
}

/// One participant's view of a room and its quiz
#[derive_where(Debug)]
pub struct Client<T: Transport> {
    #[derive_where(skip)]
    transport: T,
    options: Options,
    self_id: Option<Id>,
    session: Option<Session>,
    router: Router,
    quiz_ready: bool,
    generating: bool,
    run: Option<QuizRun>,
    notification: Option<Notification>,
}

impl<T: Transport> Client<T> {
    /// Creates a client on the Home screen
    ///
    /// # Errors
    ///
    /// Returns the validation report if `options` are out of bounds.
    pub fn new(transport: T, options: Options) -> Result<Self, garde::Report> {
        options.validate()?;

        Ok(Self {
            transport,
            options,
            self_id: None,
            session: None,
            router: Router::default(),
            quiz_ready: false,
            generating: false,
            run: None,
            notification: None,
        })
    }

    fn send(&self, message: impl Into<OutgoingMessage>) {
        self.transport.send(&message.into());
    }

    fn reject(&mut self, error: Error) -> Error {
        tracing::debug!(%error, "intent rejected");
        self.notification = Some(Notification::error(error.to_string()));
        error
    }

    fn room_code(&self) -> Result<RoomCode, Error> {
        self.session
            .as_ref()
            .map(|session| session.room_code.clone())
            .ok_or(Error::NoSession)
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        if let Some(session) = &mut self.session {
            session.lifecycle = lifecycle;
        }
    }

    fn game_in_progress(&self) -> bool {
        self.router.screen() == Screen::Quiz
    }

    fn apply_advance(&mut self, advance: Advance) -> bool {
        match advance {
            Advance::Question(_) => true,
            Advance::Ended => {
                self.set_lifecycle(Lifecycle::Ended);
                true
            }
            Advance::Ignored => false,
        }
    }

    /// Handles a message pushed by the remote authority
    ///
    /// # Arguments
    ///
    /// * `message` - The inbound message
    /// * `schedule_alarm` - Asks the host runtime to call [`Client::receive_alarm`] later
    pub fn receive_message<S: FnMut(Alarm, Duration)>(
        &mut self,
        message: IncomingMessage,
        schedule_alarm: S,
    ) {
        match message {
            IncomingMessage::Connected(connected) => {
                tracing::debug!(id = %connected.id, "connected");
                self.self_id = Some(connected.id);
            }
            IncomingMessage::RoomSnapshot(snapshot) => {
                let reconciliation = reconciler::apply_snapshot(
                    self.session.as_ref(),
                    snapshot,
                    self.router.screen(),
                    self.self_id.as_ref(),
                    self.quiz_ready,
                );

                tracing::info!(
                    room_code = %reconciliation.session.room_code,
                    participants = reconciliation.session.participants.len(),
                    "room snapshot applied"
                );

                self.session = Some(reconciliation.session);
                self.quiz_ready = reconciliation.quiz_ready;
                if let Some(transition) = reconciliation.transition {
                    self.router.apply(transition);
                }
            }
            IncomingMessage::UserListUpdate(list) | IncomingMessage::LeaderboardUpdate(list) => {
                self.replace_participants(list.users);
            }
            IncomingMessage::QuizReady(_) if self.game_in_progress() => {
                tracing::debug!("quiz readiness during a game ignored");
            }
            IncomingMessage::QuizReady(ready) if ready.success => {
                tracing::info!("quiz generated");
                self.quiz_ready = true;
                self.generating = false;
                self.set_lifecycle(Lifecycle::QuizReady);
                self.notification = Some(Notification::success(
                    "Your quiz has been forged! You can now start the game when you're ready.",
                ));
            }
            IncomingMessage::QuizReady(_) => self.generation_failed(),
            IncomingMessage::GameStarted(started) => self.start_run(started, schedule_alarm),
            IncomingMessage::Error(error) => {
                tracing::warn!(message = %error.message, "remote error");
                self.notification = Some(Notification::error(error.message));
            }
        }
    }

    fn replace_participants(&mut self, users: Vec<Participant>) {
        match &mut self.session {
            Some(session) => session.replace_participants(users),
            None => tracing::debug!("participant update before any room snapshot ignored"),
        }
    }

    fn start_run<S: FnMut(Alarm, Duration)>(&mut self, started: GameStarted, schedule_alarm: S) {
        if self.router.screen() != Screen::Lobby {
            tracing::warn!(screen = ?self.router.screen(), "game start outside the lobby ignored");
            return;
        }

        let Ok(room_code) = self.room_code() else {
            tracing::warn!("game start without a room ignored");
            return;
        };

        let settings = started.settings.unwrap_or(Settings {
            question_count: started.questions.len(),
            ..self.options.default_settings
        });
        let quiz = Arc::new(Quiz {
            questions: started.questions,
            settings,
        });

        match QuizRun::start(room_code, quiz, Instant::now(), schedule_alarm) {
            Ok(run) => {
                self.run = Some(run);
                self.quiz_ready = false;
                self.set_lifecycle(Lifecycle::InQuiz);
                self.router.go(Screen::Quiz);
            }
            Err(error) => {
                tracing::warn!(%error, "quiz rejected");
                self.notification = Some(Notification::error(format!(
                    "The quiz could not be started: {error}."
                )));
            }
        }
    }

    /// Handles a countdown alarm previously requested through `schedule_alarm`
    ///
    /// # Returns
    ///
    /// `true` if the quiz moved on
    pub fn receive_alarm<S: FnMut(Alarm, Duration)>(&mut self, alarm: Alarm, schedule_alarm: S) -> bool {
        let Some(run) = &mut self.run else {
            tracing::debug!(tag = alarm.tag, "alarm without a quiz run ignored");
            return false;
        };
        let advance = run.on_countdown_expired(&alarm, Instant::now(), schedule_alarm);
        self.apply_advance(advance)
    }

    /// Checks the countdown deadline, for hosts that poll instead of scheduling
    ///
    /// # Returns
    ///
    /// `true` if the quiz moved on
    pub fn poll<S: FnMut(Alarm, Duration)>(&mut self, schedule_alarm: S) -> bool {
        let Some(run) = &mut self.run else {
            return false;
        };
        let advance = run.poll(Instant::now(), schedule_alarm);
        self.apply_advance(advance)
    }

    /// Asks the remote authority to open a new room with this participant as host
    ///
    /// # Errors
    ///
    /// * `Error::MissingUsername` - The username is blank
    /// * `Error::UsernameTooLong` - The username exceeds the configured length
    pub fn create_session(&mut self, username: &str) -> Result<(), Error> {
        let username = names::validate_username(username, self.options.max_username_length)
            .map_err(|error| self.reject(error.into()))?;

        tracing::info!(%username, "creating room");
        self.send(CreateSession { username });
        Ok(())
    }

    /// Asks the remote authority to add this participant to an existing room
    ///
    /// # Errors
    ///
    /// * `Error::MissingJoinDetails` - The username or room code is blank
    /// * `Error::UsernameTooLong` - The username exceeds the configured length
    pub fn join_session(&mut self, username: &str, room_code: &str) -> Result<(), Error> {
        let username = match names::validate_username(username, self.options.max_username_length) {
            Ok(username) => username,
            Err(names::Error::Empty) => return Err(self.reject(Error::MissingJoinDetails)),
            Err(names::Error::TooLong) => return Err(self.reject(Error::UsernameTooLong)),
        };
        let room_code: RoomCode = room_code
            .parse()
            .map_err(|_| self.reject(Error::MissingJoinDetails))?;

        tracing::info!(%username, %room_code, "joining room");
        self.send(JoinSession {
            room_code,
            username,
        });
        Ok(())
    }

    /// Asks the generator for a quiz built from `source`
    ///
    /// Bounds are checked in the order the host controls show them: question
    /// count, time per question, then the source itself.
    ///
    /// # Errors
    ///
    /// * `Error::NoSession` - No room is known yet
    /// * `Error::GameInProgress` - The quiz screen is already showing
    /// * `Error::QuestionCountOutOfRange` - `question_count` is outside the allowed bounds
    /// * `Error::TimeOutOfRange` - `time_per_question` is outside the allowed bounds
    /// * `Error::MissingFile` - The file source has no name
    /// * `Error::MissingText` - The text source is blank
    pub fn generate_quiz(
        &mut self,
        source: QuizSource,
        question_count: usize,
        time_per_question: u64,
    ) -> Result<(), Error> {
        let room_code = self.room_code().map_err(|error| self.reject(error))?;
        if self.game_in_progress() {
            return Err(self.reject(Error::GameInProgress));
        }

        if !(constants::quiz::MIN_QUESTION_COUNT..=constants::quiz::MAX_QUESTION_COUNT)
            .contains(&question_count)
        {
            return Err(self.reject(Error::QuestionCountOutOfRange));
        }
        if !(constants::quiz::MIN_TIME_PER_QUESTION..=constants::quiz::MAX_TIME_PER_QUESTION)
            .contains(&time_per_question)
        {
            return Err(self.reject(Error::TimeOutOfRange));
        }
        match &source {
            QuizSource::File { name, .. } if name.trim().is_empty() => {
                return Err(self.reject(Error::MissingFile));
            }
            QuizSource::Text(text) if text.trim().is_empty() => {
                return Err(self.reject(Error::MissingText));
            }
            _ => {}
        }

        tracing::info!(%room_code, question_count, time_per_question, "requesting quiz");
        self.generating = true;
        self.set_lifecycle(Lifecycle::QuizGenerating);
        self.send(GenerateQuiz {
            source,
            question_count,
            time_per_question,
            room_code,
        });
        Ok(())
    }

    /// Reports that a quiz request failed to reach the generator or was refused
    ///
    /// Ignored once the game has started.
    pub fn generation_failed(&mut self) {
        if self.game_in_progress() {
            tracing::debug!("generation failure during a game ignored");
            return;
        }
        tracing::warn!("quiz generation failed");
        self.generating = false;
        self.set_lifecycle(Lifecycle::Lobby);
    }

    /// Asks the remote authority to start the game for the whole room
    ///
    /// # Errors
    ///
    /// * `Error::NoSession` - No room is known yet
    pub fn start_game(&mut self) -> Result<(), Error> {
        let room_code = self.room_code().map_err(|error| self.reject(error))?;
        tracing::info!(%room_code, "starting game");
        self.send(StartGame { room_code });
        Ok(())
    }

    /// Locks in an answer for the current question
    ///
    /// # Returns
    ///
    /// `true` if the answer was accepted and submitted
    pub fn select_answer(&mut self, option: usize) -> bool {
        match &mut self.run {
            Some(run) => run.select_answer(option, Instant::now(), &self.transport),
            None => false,
        }
    }

    /// The manual "Next" action, available once the current question is answered
    ///
    /// # Returns
    ///
    /// `true` if the quiz moved on
    pub fn next<S: FnMut(Alarm, Duration)>(&mut self, schedule_alarm: S) -> bool {
        let Some(run) = &mut self.run else {
            return false;
        };
        let advance = run.next(Instant::now(), schedule_alarm);
        self.apply_advance(advance)
    }

    /// What should be rendered right now
    pub fn view(&self) -> View {
        match self.router.screen() {
            Screen::Home => View::Home,
            Screen::Lobby => View::Lobby,
            Screen::Quiz if self.run.as_ref().is_none_or(QuizRun::is_over) => View::QuizEnded,
            Screen::Quiz => View::Quiz,
        }
    }

    /// The active screen
    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    /// The reconciled room, once a snapshot has arrived
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The local quiz run, once a game has started
    pub fn run(&self) -> Option<&QuizRun> {
        self.run.as_ref()
    }

    /// This participant's id, once the connection reported it
    pub fn self_id(&self) -> Option<&Id> {
        self.self_id.as_ref()
    }

    /// Participants ordered for the leaderboard
    pub fn ranking(&self) -> Vec<Standing> {
        self.session
            .as_ref()
            .map(|session| leaderboard::rank(&session.participants))
            .unwrap_or_default()
    }

    /// This participant's 1-based place on the leaderboard
    pub fn placement(&self) -> Option<usize> {
        let session = self.session.as_ref()?;
        let id = self.self_id.as_ref()?;
        leaderboard::position_of(&session.participants, id)
    }

    /// The end-of-quiz message, `None` until the quiz has ended
    pub fn final_message(&self) -> Option<String> {
        (self.view() == View::QuizEnded).then(|| leaderboard::placement_message(self.placement()))
    }

    /// Whether this participant hosts the current room
    pub fn is_host(&self) -> bool {
        match (&self.session, &self.self_id) {
            (Some(session), Some(id)) => session.is_host(id),
            _ => false,
        }
    }

    /// Whether the host's start control should be enabled
    pub fn quiz_ready(&self) -> bool {
        self.quiz_ready
    }

    /// Whether a quiz request is in flight
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Initial values for the host's quiz controls
    pub fn default_settings(&self) -> Settings {
        self.options.default_settings
    }

    /// The notification currently shown, if any
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Closes the current notification
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Discards the room and quiz and returns to Home
    ///
    /// The live countdown is cancelled, so an alarm already in flight is
    /// ignored when it arrives. The connection and its id are kept.
    pub fn restart(&mut self) {
        if let Some(run) = &mut self.run {
            run.cancel_countdown();
        }
        tracing::info!("restarting");
        self.run = None;
        self.session = None;
        self.quiz_ready = false;
        self.generating = false;
        self.notification = None;
        self.router.restart();
    }

    /// Cancels any pending countdown and closes the transport
    pub fn teardown(mut self) {
        if let Some(run) = &mut self.run {
            run.cancel_countdown();
        }
        tracing::debug!("tearing down");
        self.transport.close();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
    };

    use super::*;
    use crate::{
        message::{Connected, ErrorMessage, QuizReady, RoomSnapshot, UserList},
        quiz::config::Question,
    };

    #[derive(Debug, Clone, Default)]
    struct MockTransport {
        sent: Rc<RefCell<Vec<OutgoingMessage>>>,
        closed: Rc<Cell<bool>>,
    }

    impl Transport for MockTransport {
        fn send(&self, message: &OutgoingMessage) {
            self.sent.borrow_mut().push(message.clone());
        }

        fn close(self) {
            self.closed.set(true);
        }
    }

    fn create_client() -> (Client<MockTransport>, MockTransport) {
        let transport = MockTransport::default();
        let client = Client::new(transport.clone(), Options::default()).unwrap();
        (client, transport)
    }

    fn no_schedule() -> impl FnMut(Alarm, Duration) {
        |_, _| {}
    }

    fn connected(id: &str) -> IncomingMessage {
        IncomingMessage::Connected(Connected { id: Id::from(id) })
    }

    fn snapshot(host: &str, users: &[(&str, u64)]) -> IncomingMessage {
        IncomingMessage::RoomSnapshot(RoomSnapshot {
            room_code: "AB12".parse().unwrap(),
            host_id: Id::from(host),
            users: users
                .iter()
                .map(|(id, score)| Participant::new(*id, id.to_uppercase(), *score))
                .collect(),
        })
    }

    fn leaderboard(users: &[(&str, u64)]) -> IncomingMessage {
        IncomingMessage::LeaderboardUpdate(UserList {
            users: users
                .iter()
                .map(|(id, score)| Participant::new(*id, id.to_uppercase(), *score))
                .collect(),
        })
    }

    fn game_started(question_count: usize, settings: Option<Settings>) -> IncomingMessage {
        IncomingMessage::GameStarted(GameStarted {
            questions: (0..question_count)
                .map(|i| Question {
                    question: format!("Question {i}"),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    correct_answer: 0,
                })
                .collect(),
            settings,
        })
    }

    fn host_in_lobby() -> (Client<MockTransport>, MockTransport) {
        let (mut client, transport) = create_client();
        client.receive_message(connected("me"), no_schedule());
        client.receive_message(snapshot("me", &[("me", 0), ("p", 0)]), no_schedule());
        (client, transport)
    }

    fn in_quiz(question_count: usize) -> (Client<MockTransport>, MockTransport, Vec<Alarm>) {
        let (mut client, transport) = host_in_lobby();
        let mut alarms = Vec::new();
        client.receive_message(game_started(question_count, None), |alarm, _| {
            alarms.push(alarm);
        });
        (client, transport, alarms)
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let options = Options {
            max_username_length: 0,
            ..Options::default()
        };
        assert!(Client::new(MockTransport::default(), options).is_err());
    }

    #[test]
    fn test_create_session_sends_trimmed_name() {
        let (mut client, transport) = create_client();
        assert_eq!(client.create_session("  Ada "), Ok(()));
        assert_eq!(
            transport.sent.borrow().as_slice(),
            [OutgoingMessage::from(CreateSession {
                username: "Ada".to_owned()
            })]
        );
        assert_eq!(client.notification(), None);
    }

    #[test]
    fn test_create_session_blank_username() {
        let (mut client, transport) = create_client();
        assert_eq!(client.create_session("   "), Err(Error::MissingUsername));
        assert!(transport.sent.borrow().is_empty());

        let notification = client.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.title, "Heads Up!");
        assert_eq!(notification.message, "Please enter a username first!");
    }

    #[test]
    fn test_create_session_username_too_long() {
        let (mut client, transport) = create_client();
        let name = "x".repeat(31);
        assert_eq!(client.create_session(&name), Err(Error::UsernameTooLong));
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(client.notification().unwrap().message, "Username is too long.");
    }

    #[test]
    fn test_join_session_requires_both_fields() {
        let (mut client, transport) = create_client();
        assert_eq!(client.join_session("Ada", " "), Err(Error::MissingJoinDetails));
        assert_eq!(client.join_session("", "AB12"), Err(Error::MissingJoinDetails));
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(
            client.notification().unwrap().message,
            "Please enter a username and a room code!"
        );

        assert_eq!(client.join_session("Ada", " AB12 "), Ok(()));
        let sent = transport.sent.borrow();
        let OutgoingMessage::JoinSession(join) = &sent[0] else {
            panic!("Expected JoinSession");
        };
        assert_eq!(join.room_code.as_str(), "AB12");
        assert_eq!(join.username, "Ada");
    }

    #[test]
    fn test_snapshot_moves_home_to_lobby() {
        let (client, _) = host_in_lobby();
        assert_eq!(client.view(), View::Lobby);
        assert!(client.is_host());
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::Lobby);
    }

    #[test]
    fn test_generate_quiz_validation_messages() {
        let (mut client, transport) = host_in_lobby();

        let cases = [
            (QuizSource::Text("notes".into()), 4, 20, Error::QuestionCountOutOfRange),
            (QuizSource::Text("notes".into()), 31, 20, Error::QuestionCountOutOfRange),
            (QuizSource::Text("notes".into()), 10, 9, Error::TimeOutOfRange),
            (QuizSource::Text("notes".into()), 10, 61, Error::TimeOutOfRange),
            (QuizSource::Text("  ".into()), 10, 20, Error::MissingText),
            (
                QuizSource::File {
                    name: String::new(),
                    bytes: Vec::new(),
                },
                10,
                20,
                Error::MissingFile,
            ),
        ];

        for (source, count, time, expected) in cases {
            assert_eq!(client.generate_quiz(source, count, time), Err(expected));
            assert_eq!(client.notification().unwrap().message, expected.to_string());
            assert!(!client.is_generating());
        }
        assert!(transport.sent.borrow().is_empty());

        assert_eq!(
            Error::QuestionCountOutOfRange.to_string(),
            "Number of questions must be between 5 and 30."
        );
        assert_eq!(
            Error::TimeOutOfRange.to_string(),
            "Time per question must be between 10 and 60 seconds."
        );
        assert_eq!(Error::MissingFile.to_string(), "Please select a file first!");
        assert_eq!(Error::MissingText.to_string(), "Please paste some text first!");
    }

    #[test]
    fn test_generate_quiz_without_room() {
        let (mut client, transport) = create_client();
        assert_eq!(
            client.generate_quiz(QuizSource::Text("notes".into()), 10, 20),
            Err(Error::NoSession)
        );
        assert_eq!(client.start_game(), Err(Error::NoSession));
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(
            client.notification().unwrap().message,
            "Join or create a room first."
        );
    }

    #[test]
    fn test_generate_quiz_then_ready() {
        let (mut client, transport) = host_in_lobby();

        assert_eq!(
            client.generate_quiz(QuizSource::Text("photosynthesis".into()), 10, 20),
            Ok(())
        );
        assert!(client.is_generating());
        assert_eq!(
            client.session().unwrap().lifecycle,
            Lifecycle::QuizGenerating
        );
        assert!(matches!(
            transport.sent.borrow()[0],
            OutgoingMessage::GenerateQuiz(_)
        ));

        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: true }),
            no_schedule(),
        );
        assert!(client.quiz_ready());
        assert!(!client.is_generating());
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::QuizReady);

        let notification = client.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.title, "Success!");
        assert_eq!(
            notification.message,
            "Your quiz has been forged! You can now start the game when you're ready."
        );
    }

    #[test]
    fn test_generation_failed_resets_indicator() {
        let (mut client, _) = host_in_lobby();
        client
            .generate_quiz(QuizSource::Text("notes".into()), 10, 20)
            .unwrap();

        client.generation_failed();
        assert!(!client.is_generating());
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::Lobby);

        client
            .generate_quiz(QuizSource::Text("notes".into()), 10, 20)
            .unwrap();
        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: false }),
            no_schedule(),
        );
        assert!(!client.is_generating());
        assert!(!client.quiz_ready());
    }

    #[test]
    fn test_remote_error_is_shown_verbatim() {
        let (mut client, _) = host_in_lobby();
        client.receive_message(
            IncomingMessage::Error(ErrorMessage {
                message: "Room not found".to_owned(),
            }),
            no_schedule(),
        );
        assert_eq!(client.notification().unwrap().message, "Room not found");
        assert_eq!(client.view(), View::Lobby);

        client.dismiss_notification();
        assert_eq!(client.notification(), None);
    }

    #[test]
    fn test_start_game_sends_room_code() {
        let (mut client, transport) = host_in_lobby();
        assert_eq!(client.start_game(), Ok(()));
        assert_eq!(
            transport.sent.borrow().as_slice(),
            [OutgoingMessage::from(StartGame {
                room_code: "AB12".parse().unwrap()
            })]
        );
    }

    #[test]
    fn test_game_started_enters_quiz() {
        let (client, _, alarms) = in_quiz(5);

        assert_eq!(client.view(), View::Quiz);
        assert_eq!(client.screen(), Screen::Quiz);
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::InQuiz);
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms[0].tag, 0);
        assert_eq!(
            client.run().unwrap().quiz().settings,
            Settings {
                question_count: 5,
                time_per_question: 20,
            }
        );
    }

    #[test]
    fn test_game_started_uses_sent_settings() {
        let (mut client, _) = host_in_lobby();
        let settings = Settings {
            question_count: 5,
            time_per_question: 45,
        };
        let mut durations = Vec::new();
        client.receive_message(game_started(5, Some(settings)), |_, duration| {
            durations.push(duration);
        });
        assert_eq!(durations, [Duration::from_secs(45)]);
    }

    #[test]
    fn test_rejected_quiz_keeps_lobby() {
        let (mut client, _) = host_in_lobby();
        client.receive_message(game_started(0, None), no_schedule());

        assert_eq!(client.view(), View::Lobby);
        assert!(client.run().is_none());
        assert_eq!(client.notification().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn test_snapshot_during_quiz_keeps_quiz_screen() {
        let (mut client, _, _) = in_quiz(5);
        client.receive_message(snapshot("me", &[("me", 0)]), no_schedule());
        client.receive_message(snapshot("p", &[("p", 0)]), no_schedule());
        assert_eq!(client.view(), View::Quiz);
    }

    #[test]
    fn test_duplicate_game_started_is_ignored() {
        let (mut client, _, _) = in_quiz(5);
        client.select_answer(1);
        let mut alarms = Vec::new();
        client.receive_message(game_started(10, None), |alarm, _| alarms.push(alarm));

        assert!(alarms.is_empty());
        assert_eq!(client.run().unwrap().quiz().len(), 5);
        assert_eq!(client.run().unwrap().selection(), Some(1));
    }

    #[test]
    fn test_answer_submitted_once() {
        let (mut client, transport, _) = in_quiz(5);
        assert!(client.select_answer(2));
        assert!(!client.select_answer(3));

        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        let OutgoingMessage::SubmitAnswer(answer) = &sent[0] else {
            panic!("Expected SubmitAnswer");
        };
        assert_eq!(answer.question_index, 0);
        assert_eq!(answer.answer_index, 2);
    }

    #[test]
    fn test_next_and_alarm_race() {
        let (mut client, _, alarms) = in_quiz(5);

        assert!(!client.next(no_schedule()));
        client.select_answer(0);

        let mut next_alarms = Vec::new();
        assert!(client.next(|alarm, _| next_alarms.push(alarm)));
        assert!(!client.receive_alarm(alarms[0], no_schedule()));
        assert_eq!(client.run().unwrap().index(), 1);

        assert!(client.receive_alarm(next_alarms[0], no_schedule()));
        assert_eq!(client.run().unwrap().index(), 2);
        assert!(!client.next(no_schedule()));
    }

    #[test]
    fn test_alarms_drive_quiz_to_end() {
        let (mut client, _, alarms) = in_quiz(5);
        client.receive_message(connected("me"), no_schedule());
        client.receive_message(leaderboard(&[("p", 30), ("me", 50)]), no_schedule());

        let mut pending = alarms;
        while let Some(alarm) = pending.pop() {
            assert_eq!(client.final_message(), None);
            let mut next = Vec::new();
            client.receive_alarm(alarm, |a, _| next.push(a));
            pending = next;
        }

        assert_eq!(client.view(), View::QuizEnded);
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::Ended);
        assert_eq!(client.placement(), Some(1));
        assert_eq!(
            client.final_message().unwrap(),
            "Incredible! You are the Quiz Champion! 🏆"
        );
    }

    #[test]
    fn test_leaderboard_update_orders_ranking() {
        let (mut client, _, _) = in_quiz(5);
        client.receive_message(
            leaderboard(&[("a", 50), ("b", 80), ("c", 80)]),
            no_schedule(),
        );

        let ranking = client
            .ranking()
            .into_iter()
            .map(|s| (s.participant.id.as_str().to_owned(), s.rank))
            .collect::<Vec<_>>();
        assert_eq!(
            ranking,
            [("b".to_owned(), 1), ("c".to_owned(), 2), ("a".to_owned(), 3)]
        );
        assert_eq!(client.view(), View::Quiz);
        assert_eq!(client.placement(), None);
    }

    #[test]
    fn test_leaderboard_before_room_is_ignored() {
        let (mut client, _) = create_client();
        client.receive_message(leaderboard(&[("a", 50)]), no_schedule());
        assert!(client.session().is_none());
        assert!(client.ranking().is_empty());
    }

    #[test]
    fn test_host_readiness_cleared_on_new_lobby() {
        let (mut client, _) = create_client();
        client.receive_message(connected("me"), no_schedule());
        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: true }),
            no_schedule(),
        );
        assert!(client.quiz_ready());
        assert_eq!(client.view(), View::Home);

        client.receive_message(snapshot("me", &[("me", 0)]), no_schedule());
        assert!(!client.quiz_ready());
        assert_eq!(client.view(), View::Lobby);
    }

    #[test]
    fn test_guest_readiness_survives_new_lobby() {
        let (mut client, _) = create_client();
        client.receive_message(connected("me"), no_schedule());
        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: true }),
            no_schedule(),
        );

        client.receive_message(snapshot("h", &[("h", 0), ("me", 0)]), no_schedule());
        assert!(client.quiz_ready());
    }

    #[test]
    fn test_late_quiz_ready_during_quiz_is_ignored() {
        let (mut client, _, _) = in_quiz(5);

        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: true }),
            no_schedule(),
        );
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::InQuiz);
        assert!(!client.quiz_ready());
        assert_eq!(client.notification(), None);

        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: false }),
            no_schedule(),
        );
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::InQuiz);

        client.generation_failed();
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::InQuiz);
        assert_eq!(client.view(), View::Quiz);
    }

    #[test]
    fn test_late_push_after_end_keeps_ended() {
        let (mut client, _, alarms) = in_quiz(5);
        let mut pending = alarms;
        while let Some(alarm) = pending.pop() {
            let mut next = Vec::new();
            client.receive_alarm(alarm, |a, _| next.push(a));
            pending = next;
        }
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::Ended);

        client.receive_message(
            IncomingMessage::QuizReady(QuizReady { success: true }),
            no_schedule(),
        );
        client.receive_message(snapshot("me", &[("me", 0), ("p", 0)]), no_schedule());
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::Ended);
        assert_eq!(client.view(), View::QuizEnded);
    }

    #[test]
    fn test_generate_quiz_during_quiz_is_rejected() {
        let (mut client, transport, _) = in_quiz(5);
        assert_eq!(
            client.generate_quiz(QuizSource::Text("notes".into()), 10, 20),
            Err(Error::GameInProgress)
        );
        assert!(!client.is_generating());
        assert_eq!(client.session().unwrap().lifecycle, Lifecycle::InQuiz);
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(
            client.notification().unwrap().message,
            "The game has already started."
        );
    }

    #[test]
    fn test_other_room_snapshot_during_quiz_is_ignored() {
        let (mut client, transport, _) = in_quiz(5);
        client.receive_message(
            IncomingMessage::RoomSnapshot(RoomSnapshot {
                room_code: "ZZ99".parse().unwrap(),
                host_id: Id::from("x"),
                users: vec![Participant::new("x", "X", 0)],
            }),
            no_schedule(),
        );

        let session = client.session().unwrap();
        assert_eq!(session.room_code.as_str(), "AB12");
        assert_eq!(session.lifecycle, Lifecycle::InQuiz);
        assert_eq!(client.view(), View::Quiz);

        client.select_answer(0);
        let OutgoingMessage::SubmitAnswer(answer) = &transport.sent.borrow()[0] else {
            panic!("Expected SubmitAnswer");
        };
        assert_eq!(answer.room_code.as_str(), "AB12");
    }

    #[test]
    fn test_game_started_question_count_mismatch_rejected() {
        let (mut client, _) = host_in_lobby();
        let settings = Settings {
            question_count: 5,
            time_per_question: 20,
        };
        client.receive_message(game_started(3, Some(settings)), no_schedule());

        assert_eq!(client.view(), View::Lobby);
        assert!(client.run().is_none());
        assert_eq!(client.notification().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn test_game_started_too_many_questions_rejected() {
        let (mut client, _) = host_in_lobby();
        let mut alarms = Vec::new();
        client.receive_message(game_started(45, None), |alarm, _| alarms.push(alarm));

        assert_eq!(client.view(), View::Lobby);
        assert!(client.run().is_none());
        assert!(alarms.is_empty());
    }

    #[test]
    fn test_restart_cancels_countdown() {
        let (mut client, transport, alarms) = in_quiz(5);

        client.restart();
        assert_eq!(client.view(), View::Home);
        assert!(client.session().is_none());
        assert!(!client.receive_alarm(alarms[0], no_schedule()));
        assert!(!client.select_answer(0));
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(client.self_id(), Some(&Id::from("me")));
    }

    #[test]
    fn test_teardown_closes_transport() {
        let (client, transport, _) = in_quiz(5);
        client.teardown();
        assert!(transport.closed.get());
    }

    #[test]
    fn test_default_settings() {
        let (client, _) = create_client();
        assert_eq!(client.default_settings(), Settings::default());
        assert_eq!(client.view(), View::Home);
        assert!(!client.is_host());
    }
}
