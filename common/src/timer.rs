//! Debounced hover dismissal.
//!
//! The controller never sleeps or spawns anything itself; it asks an injected
//! [`DebounceTimer`] to call back later with a [`DismissToken`] and ignores
//! any token that is no longer the pending one.

use std::time::Duration;

/// Identifies one scheduled dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissToken(u64);

impl DismissToken {
    pub(crate) fn new(n: u64) -> Self {
        Self(n)
    }
}

/// Schedules a one-shot callback carrying `token` after `delay`.
///
/// Implementations deliver the token back through
/// [`CalendarController::dismiss_elapsed`](crate::controller::CalendarController::dismiss_elapsed).
pub trait DebounceTimer {
    type Handle;

    /// Returns `None` when nothing could be scheduled; the caller then acts
    /// as if the delay had already elapsed.
    fn schedule(&mut self, delay: Duration, token: DismissToken) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

/// A timer that never schedules anything, so dismissals happen immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTimer;

impl DebounceTimer for ImmediateTimer {
    type Handle = ();

    fn schedule(&mut self, _delay: Duration, _token: DismissToken) -> Option<()> {
        None
    }

    fn cancel(&mut self, _handle: ()) {}
}
