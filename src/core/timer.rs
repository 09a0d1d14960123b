//! # Auto-Revert Timer
//!
//! After an action's response has been on screen for a while, the navigator
//! returns to the screen that fired it. There is at most one such timer in
//! flight, and it is tied to the transient screen it was scheduled for.
//!
//! The timer is passive: nothing fires by itself. The owner calls
//! [`RevertTimer::take_due`] with the current instant (real or simulated) and
//! gets the pending revert back once its deadline has passed. Cancelling or
//! rescheduling bumps a generation counter, so a revert handed out for an old
//! schedule can never be mistaken for the current one.

use std::time::Instant;

use crate::core::screen::ScreenId;

/// A scheduled return from a transient screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRevert {
    pub generation: u64,
    /// The transient screen this revert belongs to.
    pub screen: ScreenId,
    pub due: Instant,
}

#[derive(Debug, Default)]
pub struct RevertTimer {
    pending: Option<PendingRevert>,
    generation: u64,
}

impl RevertTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a revert for `screen`, replacing any pending one.
    pub fn schedule(&mut self, screen: ScreenId, due: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingRevert {
            generation: self.generation,
            screen,
            due,
        });
        self.generation
    }

    /// Drop the pending revert, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.pending.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Hand out the pending revert once `now` has reached its deadline.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingRevert> {
        if self.pending.as_ref().is_some_and(|p| p.due <= now) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether `revert` is still the latest schedule.
    pub fn is_current(&self, revert: &PendingRevert) -> bool {
        revert.generation == self.generation
    }
}
