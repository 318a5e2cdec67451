//! Screen routing
//!
//! Exactly one screen is active at a time and the only ways to move are
//! forward: Home to Lobby, Lobby to Quiz. The quiz screen is terminal
//! until [`Router::restart`] returns to Home, which mirrors a full restart
//! of the application.

use serde::Serialize;

/// The top-level screens a participant can be on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    /// Username entry, create or join a room
    #[default]
    Home,
    /// Waiting room with host controls
    Lobby,
    /// Questions being played, including the end-of-quiz results
    Quiz,
}

/// A requested move from one screen to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenTransition {
    /// The screen active when the transition was decided
    pub from: Screen,
    /// The screen to show next
    pub to: Screen,
}

/// Outcome of asking the router to transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// The active screen changed
    Moved,
    /// The target was already active
    Stayed,
    /// The move is not allowed from the current screen
    Rejected,
}

/// Holds the single authoritative screen
#[derive(Debug, Default)]
pub struct Router {
    screen: Screen,
}

impl Router {
    /// Returns the active screen
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Attempts to show `to`
    ///
    /// # Returns
    ///
    /// Whether the screen moved, stayed, or the move was refused
    pub fn go(&mut self, to: Screen) -> Routing {
        match (self.screen, to) {
            (from, to) if from == to => Routing::Stayed,
            (Screen::Home, Screen::Lobby) | (Screen::Lobby, Screen::Quiz) => {
                tracing::debug!(?to, from = ?self.screen, "screen changed");
                self.screen = to;
                Routing::Moved
            }
            (from, to) => {
                tracing::warn!(?from, ?to, "refused screen transition");
                Routing::Rejected
            }
        }
    }

    /// Applies a transition decided elsewhere
    ///
    /// A transition computed against a screen that is no longer active is
    /// refused.
    pub fn apply(&mut self, transition: ScreenTransition) -> Routing {
        if transition.from == self.screen {
            self.go(transition.to)
        } else {
            Routing::Rejected
        }
    }

    /// Returns to Home unconditionally
    pub fn restart(&mut self) {
        self.screen = Screen::Home;
    }
}
