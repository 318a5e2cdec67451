//! Room snapshot reconciliation
//!
//! The remote authority pushes full room snapshots whenever membership
//! changes, and may deliver them late or more than once. This module merges
//! a snapshot into the local session and decides whether the participant
//! should be shown the lobby.
//!
//! A snapshot never pulls a participant out of a running quiz: while the
//! quiz screen is active no transition is produced, whatever the snapshot
//! says. Only restarting leaves the quiz screen.

use crate::{
    message::RoomSnapshot,
    participant::Id,
    router::{Screen, ScreenTransition},
    session::{Lifecycle, Session},
};

/// Result of merging one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The session after applying the snapshot
    pub session: Session,
    /// The screen change to request, `None` to stay put
    pub transition: Option<ScreenTransition>,
    /// The readiness flag for the host's start control after the snapshot
    pub quiz_ready: bool,
}

/// Merges an inbound room snapshot into the local session
///
/// # Arguments
///
/// * `current` - The session known so far, `None` before the first snapshot
/// * `incoming` - The snapshot just received
/// * `screen` - The screen currently shown
/// * `self_id` - This participant's id, if the connection has reported it
/// * `quiz_ready` - The current readiness flag
///
/// # Returns
///
/// The updated session, the screen transition to request, and the
/// readiness flag to keep.
///
/// Membership and host are replaced wholesale from the snapshot. When the
/// room code matches the current session the lifecycle is kept and scores
/// never decrease; a different room starts over in [`Lifecycle::Lobby`],
/// except on the quiz screen, where a snapshot for another room leaves the
/// session untouched so the run keeps its room and lifecycle.
///
/// Entering a lobby from Home as its host clears `quiz_ready`, so a start
/// control left enabled by an earlier game in the same process does not
/// carry over.
pub fn apply_snapshot(
    current: Option<&Session>,
    incoming: RoomSnapshot,
    screen: Screen,
    self_id: Option<&Id>,
    quiz_ready: bool,
) -> Reconciliation {
    let RoomSnapshot {
        room_code,
        host_id,
        users,
    } = incoming;

    let session = match current {
        Some(current) if current.room_code == room_code => {
            let mut session = current.clone();
            session.host_id = host_id;
            session.replace_participants(users);
            session
        }
        Some(current) if screen == Screen::Quiz => {
            tracing::debug!(
                room_code = %room_code,
                current = %current.room_code,
                "snapshot for another room during quiz ignored"
            );
            current.clone()
        }
        _ => Session {
            room_code,
            participants: users,
            host_id,
            lifecycle: Lifecycle::Lobby,
        },
    };

    let transition = match screen {
        Screen::Quiz => {
            tracing::debug!(room_code = %session.room_code, "snapshot during quiz, staying on quiz screen");
            None
        }
        from => Some(ScreenTransition {
            from,
            to: Screen::Lobby,
        }),
    };

    let entering_as_host =
        screen == Screen::Home && self_id.is_some_and(|id| session.is_host(id));

    Reconciliation {
        quiz_ready: quiz_ready && !entering_as_host,
        session,
        transition,
    }
}
