//! Configuration constants for the quizforge client core
//!
//! This module contains the limits shared by input validation, quiz
//! settings and the progression engine so that every component agrees
//! on the same boundaries.

/// Quiz settings limits
pub mod quiz {
    /// Minimum number of questions a generated quiz may contain
    pub const MIN_QUESTION_COUNT: usize = 5;
    /// Maximum number of questions a generated quiz may contain
    pub const MAX_QUESTION_COUNT: usize = 30;
    /// Minimum time in seconds allowed for answering one question
    pub const MIN_TIME_PER_QUESTION: u64 = 10;
    /// Maximum time in seconds allowed for answering one question
    pub const MAX_TIME_PER_QUESTION: u64 = 60;
    /// Question count offered to the host before they pick one
    pub const DEFAULT_QUESTION_COUNT: usize = 10;
    /// Seconds per question offered to the host, also used when a game starts without settings
    pub const DEFAULT_TIME_PER_QUESTION: u64 = 20;
    /// Minimum number of options a multiple choice question must offer
    pub const MIN_OPTION_COUNT: usize = 2;
}

/// Username limits
pub mod username {
    /// Default maximum length of a username in characters
    pub const DEFAULT_MAX_LENGTH: usize = 30;
    /// Upper bound a host application may configure for usernames
    pub const MAX_CONFIGURABLE_LENGTH: usize = 64;
}
