//! Leaderboard ranking
//!
//! Rankings are never stored. They are recomputed from the session's
//! participant list every time they are needed, so they cannot drift from
//! the scores the remote authority last reported.
//!
//! Ties are resolved by input order: the sort is stable and every
//! participant receives its own 1-based position, so two participants on
//! the same score get different, consecutive rank numbers.

use itertools::Itertools;
use serde::Serialize;

use super::participant::{Id, Participant};

/// A participant together with its position in the ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// 1-based position in the ranking
    pub rank: usize,
    /// The ranked participant
    pub participant: Participant,
}

/// Orders participants by descending score
///
/// # Arguments
///
/// * `participants` - Participants in the order the remote authority listed them
///
/// # Returns
///
/// One [`Standing`] per participant, highest score first. Equal scores keep
/// their relative input order.
///
/// # Examples
///
/// ```rust
/// use quizforge::leaderboard::rank;
/// use quizforge::participant::Participant;
///
/// let ranked = rank(&[
///     Participant::new("a", "A", 50),
///     Participant::new("b", "B", 80),
///     Participant::new("c", "C", 80),
/// ]);
/// let order: Vec<_> = ranked.iter().map(|s| (s.participant.username.as_str(), s.rank)).collect();
/// assert_eq!(order, [("B", 1), ("C", 2), ("A", 3)]);
/// ```
pub fn rank(participants: &[Participant]) -> Vec<Standing> {
    participants
        .iter()
        .sorted_by(|a, b| b.score.cmp(&a.score))
        .enumerate()
        .map(|(position, participant)| Standing {
            rank: position + 1,
            participant: participant.clone(),
        })
        .collect_vec()
}

/// Finds the 1-based rank of a participant
///
/// # Returns
///
/// `None` if no participant with `id` is present.
pub fn position_of(participants: &[Participant], id: &Id) -> Option<usize> {
    rank(participants)
        .into_iter()
        .find(|standing| &standing.participant.id == id)
        .map(|standing| standing.rank)
}

/// Chooses the closing message shown once a quiz has ended
///
/// # Arguments
///
/// * `rank` - The participant's final 1-based rank, or `None` if they have no recorded score
pub fn placement_message(rank: Option<usize>) -> String {
    match rank {
        None | Some(0) => "The quiz has ended!".to_owned(),
        Some(1) => "Incredible! You are the Quiz Champion! 🏆".to_owned(),
        Some(2) => "Magnificent! You secured second place! 🥈".to_owned(),
        Some(3) => "Outstanding! You're on the podium! 🥉".to_owned(),
        Some(n) => format!("Well played! You finished #{n}."),
    }
}
