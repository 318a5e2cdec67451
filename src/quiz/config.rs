//! Quiz content and settings
//!
//! A quiz arrives from the remote authority in one piece when the game
//! starts. Its questions are immutable afterwards and are referenced by
//! position only.

use garde::Validate;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::constants;

/// Timing and size parameters chosen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Number of questions requested from the generator
    #[garde(range(
        min = constants::quiz::MIN_QUESTION_COUNT,
        max = constants::quiz::MAX_QUESTION_COUNT
    ))]
    pub question_count: usize,
    /// Seconds each question stays open
    #[garde(range(
        min = constants::quiz::MIN_TIME_PER_QUESTION,
        max = constants::quiz::MAX_TIME_PER_QUESTION
    ))]
    pub time_per_question: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_count: constants::quiz::DEFAULT_QUESTION_COUNT,
            time_per_question: constants::quiz::DEFAULT_TIME_PER_QUESTION,
        }
    }
}

impl Settings {
    /// The answering window as a duration
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_per_question)
    }
}

/// A single multiple choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The prompt shown to participants
    pub question: String,
    /// Answer options in display order
    pub options: Vec<String>,
    /// Position of the correct option within `options`
    pub correct_answer: usize,
}

impl Question {
    /// Whether the question can be played: enough options and a correct
    /// answer that points at one of them
    pub fn is_well_formed(&self) -> bool {
        self.options.len() >= constants::quiz::MIN_OPTION_COUNT
            && self.correct_answer < self.options.len()
    }
}

/// A complete quiz as handed over at game start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Questions in play order
    pub questions: Vec<Question>,
    /// The settings the quiz was generated with
    pub settings: Settings,
}

impl Quiz {
    /// Returns the number of questions in this quiz
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Checks if this quiz contains any questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_is_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_settings_bounds() {
        for question_count in [5, 17, 30] {
            for time_per_question in [10, 35, 60] {
                let settings = Settings {
                    question_count,
                    time_per_question,
                };
                assert!(settings.validate().is_ok(), "{settings:?}");
            }
        }

        for (question_count, time_per_question) in [(4, 20), (31, 20), (10, 9), (10, 61), (0, 0)] {
            let settings = Settings {
                question_count,
                time_per_question,
            };
            assert!(settings.validate().is_err(), "{settings:?}");
        }
    }

    #[test]
    fn test_settings_wire_format() {
        let settings: Settings =
            serde_json::from_str(r#"{"questionCount":12,"timePerQuestion":25}"#).unwrap();
        assert_eq!(settings.question_count, 12);
        assert_eq!(settings.time_limit(), Duration::from_secs(25));
    }

    #[test]
    fn test_question_well_formed() {
        let mut question = Question {
            question: "2 + 2?".to_owned(),
            options: vec!["3".to_owned(), "4".to_owned()],
            correct_answer: 1,
        };
        assert!(question.is_well_formed());

        question.correct_answer = 2;
        assert!(!question.is_well_formed());

        question.correct_answer = 0;
        question.options.truncate(1);
        assert!(!question.is_well_formed());
    }

    #[test]
    fn test_question_wire_format() {
        let question: Question = serde_json::from_str(
            r#"{"question":"Capital of France?","options":["Paris","Rome"],"correctAnswer":0}"#,
        )
        .unwrap();
        assert_eq!(question.correct_answer, 0);
        assert_eq!(question.options.len(), 2);
    }
}
