//! Per-question countdown
//!
//! The countdown does not own a clock thread. Arming it asks the host
//! runtime to deliver an [`Alarm`] after a duration through the same
//! `schedule` callback shape the rest of the crate uses. When the alarm
//! comes back it is checked against the single live timer: alarms from a
//! cancelled or superseded timer are dropped, and a live timer yields its
//! tag exactly once.
//!
//! Hosts that prefer polling a deadline over scheduling can call
//! [`Countdown::poll`] instead; both paths consume the same live timer.

use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

/// Identifies one `arm` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u64);

/// Expiry signal delivered back by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    /// The timer this alarm belongs to
    pub handle: Handle,
    /// Consumer-defined tag, the question index for quiz runs
    pub tag: usize,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: Handle,
    tag: usize,
    deadline: Instant,
}

/// A single-slot countdown timer
#[derive(Debug, Default)]
pub struct Countdown {
    next_handle: u64,
    pending: Option<Pending>,
}

impl Countdown {
    /// Starts a new timer, replacing any timer still pending
    ///
    /// # Arguments
    ///
    /// * `duration` - Time until expiry
    /// * `tag` - Value returned on expiry, used by the consumer to discard stale signals
    /// * `now` - The current instant, used for [`Countdown::poll`] and [`Countdown::remaining`]
    /// * `schedule_alarm` - Asks the host runtime to deliver the alarm after `duration`
    ///
    /// # Returns
    ///
    /// The handle of the new timer
    pub fn arm<S: FnMut(Alarm, Duration)>(
        &mut self,
        duration: Duration,
        tag: usize,
        now: Instant,
        mut schedule_alarm: S,
    ) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;

        if let Some(previous) = self.pending.take() {
            tracing::trace!(handle = previous.handle.0, "superseded pending countdown");
        }

        self.pending = Some(Pending {
            handle,
            tag,
            deadline: now + duration,
        });

        schedule_alarm(Alarm { handle, tag }, duration);

        handle
    }

    /// Cancels a timer if it is still the live one
    ///
    /// # Returns
    ///
    /// `true` if the timer was pending and is now cancelled
    pub fn cancel(&mut self, handle: Handle) -> bool {
        if self.pending.is_some_and(|p| p.handle == handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancels whatever timer is pending
    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    /// Consumes a delivered alarm
    ///
    /// # Returns
    ///
    /// The tag of the live timer if `alarm` belongs to it, otherwise `None`.
    /// A given timer yields its tag at most once.
    pub fn expire(&mut self, alarm: &Alarm) -> Option<usize> {
        match self.pending {
            Some(pending) if pending.handle == alarm.handle => {
                self.pending = None;
                Some(pending.tag)
            }
            _ => None,
        }
    }

    /// Fires the live timer if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<Alarm> {
        let pending = self.pending?;
        if now >= pending.deadline {
            self.pending = None;
            Some(Alarm {
                handle: pending.handle,
                tag: pending.tag,
            })
        } else {
            None
        }
    }

    /// Time left on the live timer, `None` when nothing is pending
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    /// Whether a timer is currently pending
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
