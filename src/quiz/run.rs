//! Local quiz progression
//!
//! A [`QuizRun`] walks one participant through the questions of a quiz.
//! It owns the current question index, the locked answer for that
//! question, and the countdown that closes each question.
//!
//! Moving on happens in exactly one place, [`QuizRun::advance_from`].
//! The manual "Next" action and countdown expiry both end up there, tagged
//! with the question index they were meant for, so whichever arrives first
//! wins and the other is ignored.

use std::sync::Arc;

use garde::Validate;
use serde::Serialize;
use thiserror::Error;
use web_time::{Duration, Instant};

use crate::{
    countdown::{Alarm, Countdown},
    message::{OutgoingMessage, SubmitAnswer},
    room_code::RoomCode,
    session::Transport,
};

use super::config::{Question, Quiz};

/// Reasons a quiz cannot be started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Question count or time per question is outside the allowed bounds, or
    /// the question count disagrees with the questions supplied
    #[error("invalid quiz settings: {0}")]
    InvalidSettings(String),
    /// The quiz has no questions
    #[error("quiz has no questions")]
    EmptyQuiz,
    /// A question has too few options or a correct answer that is not one of them
    #[error("question {0} is malformed")]
    InvalidQuestion(usize),
}

/// Observable state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    /// The question at this index is open and unanswered
    WaitingForQuestion(usize),
    /// The question at the first index has been answered with the option at the second
    AnswerLocked(usize, usize),
    /// All questions have closed
    Ended,
}

/// How an option should be presented for the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionFeedback {
    /// No answer yet, the option can be chosen
    Selectable,
    /// The option is the correct answer, revealed after answering
    Correct,
    /// The option was chosen and is wrong
    Incorrect,
    /// Another option, no longer choosable
    Disabled,
}

/// Result of a request to move past a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The next question is now open
    Question(usize),
    /// The last question closed and the run ended
    Ended,
    /// The request was stale or the run had already ended
    Ignored,
}

/// One participant's progression through a quiz
#[derive(Debug)]
pub struct QuizRun {
    room_code: RoomCode,
    quiz: Arc<Quiz>,
    index: usize,
    selection: Option<usize>,
    activated_at: Instant,
    countdown: Countdown,
}

impl QuizRun {
    /// Validates a quiz and opens its first question
    ///
    /// # Arguments
    ///
    /// * `room_code` - The room answers are submitted to
    /// * `quiz` - The quiz handed over by the remote authority
    /// * `now` - The instant the first question becomes active
    /// * `schedule_alarm` - Asks the host runtime to deliver the countdown alarm
    ///
    /// # Errors
    ///
    /// * `Error::EmptyQuiz` - There are no questions
    /// * `Error::InvalidSettings` - Settings are outside the allowed bounds, or
    ///   the number of questions differs from the requested question count
    /// * `Error::InvalidQuestion` - A question cannot be played
    pub fn start<S: FnMut(Alarm, Duration)>(
        room_code: RoomCode,
        quiz: Arc<Quiz>,
        now: Instant,
        schedule_alarm: S,
    ) -> Result<Self, Error> {
        if quiz.is_empty() {
            return Err(Error::EmptyQuiz);
        }

        quiz.settings
            .validate()
            .map_err(|report| Error::InvalidSettings(report.to_string()))?;

        if quiz.len() != quiz.settings.question_count {
            return Err(Error::InvalidSettings(format!(
                "quiz has {} questions but its settings ask for {}",
                quiz.len(),
                quiz.settings.question_count
            )));
        }

        if let Some(index) = quiz.questions.iter().position(|q| !q.is_well_formed()) {
            return Err(Error::InvalidQuestion(index));
        }

        let mut run = Self {
            room_code,
            quiz,
            index: 0,
            selection: None,
            activated_at: now,
            countdown: Countdown::default(),
        };
        run.arm_countdown(now, schedule_alarm);

        tracing::info!(
            room_code = %run.room_code,
            questions = run.quiz.len(),
            seconds_per_question = run.quiz.settings.time_per_question,
            "quiz started"
        );

        Ok(run)
    }

    fn arm_countdown<S: FnMut(Alarm, Duration)>(&mut self, now: Instant, schedule_alarm: S) {
        self.countdown
            .arm(self.quiz.settings.time_limit(), self.index, now, schedule_alarm);
    }

    /// Locks in an answer for the current question and submits it
    ///
    /// Only the first valid selection per question is accepted; later calls
    /// send nothing.
    ///
    /// # Arguments
    ///
    /// * `option` - 0-based index of the chosen option
    /// * `now` - The instant the answer was given
    /// * `transport` - Channel for the `submit-answer` intent
    ///
    /// # Returns
    ///
    /// `true` if the answer was recorded and submitted
    pub fn select_answer<T: Transport>(&mut self, option: usize, now: Instant, transport: &T) -> bool {
        let Some(question) = self.current_question() else {
            tracing::debug!(option, "answer after quiz end ignored");
            return false;
        };

        if self.selection.is_some() {
            return false;
        }

        if option >= question.options.len() {
            tracing::warn!(option, index = self.index, "answer option out of range");
            return false;
        }

        self.selection = Some(option);

        let time_taken = now.saturating_duration_since(self.activated_at);

        transport.send(&OutgoingMessage::from(SubmitAnswer {
            room_code: self.room_code.clone(),
            question_index: self.index,
            answer_index: option,
            time_taken,
        }));

        tracing::debug!(
            index = self.index,
            option,
            seconds = time_taken.as_secs_f64(),
            "answer submitted"
        );

        true
    }

    /// Moves past question `index` if it is still the current one
    ///
    /// Incrementing past the last question ends the run and cancels the
    /// countdown. Otherwise the next question opens with no selection, a
    /// fresh activation instant and a re-armed countdown.
    pub fn advance_from<S: FnMut(Alarm, Duration)>(
        &mut self,
        index: usize,
        now: Instant,
        schedule_alarm: S,
    ) -> Advance {
        if self.is_over() || index != self.index {
            tracing::debug!(index, current = self.index, "stale advance ignored");
            return Advance::Ignored;
        }

        self.index += 1;
        self.selection = None;

        if self.is_over() {
            self.countdown.cancel_all();
            tracing::info!(room_code = %self.room_code, "quiz ended");
            return Advance::Ended;
        }

        self.activated_at = now;
        self.arm_countdown(now, schedule_alarm);

        Advance::Question(self.index)
    }

    /// Moves past the current question
    pub fn advance<S: FnMut(Alarm, Duration)>(&mut self, now: Instant, schedule_alarm: S) -> Advance {
        self.advance_from(self.index, now, schedule_alarm)
    }

    /// Handles the manual "Next" action
    ///
    /// Only available once the current question has been answered.
    pub fn next<S: FnMut(Alarm, Duration)>(&mut self, now: Instant, schedule_alarm: S) -> Advance {
        if self.selection.is_none() {
            return Advance::Ignored;
        }
        self.advance(now, schedule_alarm)
    }

    /// Handles a delivered countdown alarm
    ///
    /// Alarms from superseded timers, or tagged for a question that is no
    /// longer current, are ignored.
    pub fn on_countdown_expired<S: FnMut(Alarm, Duration)>(
        &mut self,
        alarm: &Alarm,
        now: Instant,
        schedule_alarm: S,
    ) -> Advance {
        match self.countdown.expire(alarm) {
            Some(tag) => self.advance_from(tag, now, schedule_alarm),
            None => {
                tracing::debug!(tag = alarm.tag, "stale countdown alarm ignored");
                Advance::Ignored
            }
        }
    }

    /// Fires the countdown if its deadline has passed, for hosts that poll
    pub fn poll<S: FnMut(Alarm, Duration)>(&mut self, now: Instant, schedule_alarm: S) -> Advance {
        match self.countdown.poll(now) {
            Some(alarm) => self.advance_from(alarm.tag, now, schedule_alarm),
            None => Advance::Ignored,
        }
    }

    /// Stops the countdown without touching progression
    pub fn cancel_countdown(&mut self) {
        self.countdown.cancel_all();
    }

    /// Whether every question has closed
    pub fn is_over(&self) -> bool {
        self.index >= self.quiz.len()
    }

    /// Returns the observable state of the run
    pub fn state(&self) -> RunState {
        match (self.is_over(), self.selection) {
            (true, _) => RunState::Ended,
            (false, None) => RunState::WaitingForQuestion(self.index),
            (false, Some(selection)) => RunState::AnswerLocked(self.index, selection),
        }
    }

    /// 0-based index of the current question, equal to the question count once ended
    pub fn index(&self) -> usize {
        self.index
    }

    /// The option locked in for the current question
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// The open question, `None` once ended
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.index)
    }

    /// 1-based question number and total, for a "Question N / M" header
    pub fn progress(&self) -> (usize, usize) {
        let total = self.quiz.len();
        ((self.index + 1).min(total), total)
    }

    /// Time left to answer the current question
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.countdown.remaining(now)
    }

    /// How `option` of the current question should be presented
    pub fn option_feedback(&self, option: usize) -> OptionFeedback {
        let (Some(question), Some(selection)) = (self.current_question(), self.selection) else {
            return OptionFeedback::Selectable;
        };

        if option == question.correct_answer {
            OptionFeedback::Correct
        } else if option == selection {
            OptionFeedback::Incorrect
        } else {
            OptionFeedback::Disabled
        }
    }

    /// The quiz being played
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// The room answers are submitted to
    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }
}
