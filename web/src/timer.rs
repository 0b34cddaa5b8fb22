//! Browser implementation of the hover-dismissal timer.

use std::time::Duration;

use earnings_common::timer::{DebounceTimer, DismissToken};
use leptos::prelude::*;

/// Schedules dismissals with `setTimeout`. When one fires, its token is
/// written to `fired`, which the calendar page forwards to the controller.
pub struct BrowserTimer {
    fired: RwSignal<Option<DismissToken>>,
}

impl BrowserTimer {
    pub fn new(fired: RwSignal<Option<DismissToken>>) -> Self {
        Self { fired }
    }
}

impl DebounceTimer for BrowserTimer {
    type Handle = TimeoutHandle;

    fn schedule(&mut self, delay: Duration, token: DismissToken) -> Option<TimeoutHandle> {
        let fired = self.fired;
        set_timeout_with_handle(
            move || {
                // The page may have unmounted since.
                fired.try_set(Some(token));
            },
            delay,
        )
        .ok()
    }

    fn cancel(&mut self, handle: TimeoutHandle) {
        handle.clear();
    }
}
