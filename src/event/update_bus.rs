// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notification fan-out for state changes.

use super::{LifecycleEvent, Signal};

/// The set of signals fired after each confirmed state change.
///
/// One [`Signal`] per event type: a generic "updated" signal that fires on
/// every change, plus one per [`LifecycleEvent`].
#[derive(Debug, Clone, Default)]
pub struct UpdateBus {
    updated: Signal,
    print_started: Signal,
    print_cancelled: Signal,
    print_finished: Signal,
}

impl UpdateBus {
    /// Creates a bus with fresh signals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal fired on every state change.
    #[must_use]
    pub fn updated(&self) -> &Signal {
        &self.updated
    }

    /// Signal fired for the given lifecycle event.
    #[must_use]
    pub fn lifecycle(&self, event: LifecycleEvent) -> &Signal {
        match event {
            LifecycleEvent::PrintStarted => &self.print_started,
            LifecycleEvent::PrintCancelled => &self.print_cancelled,
            LifecycleEvent::PrintFinished => &self.print_finished,
        }
    }

    /// Fires "updated", then each event in order.
    ///
    /// `stopped` is checked before every notification; once it returns `true`
    /// the remaining notifications are skipped. Returns the number of signals
    /// fired.
    pub(crate) fn publish(&self, events: &[LifecycleEvent], stopped: impl Fn() -> bool) -> usize {
        let signals = std::iter::once(&self.updated)
            .chain(events.iter().map(|event| self.lifecycle(*event)));

        let mut fired = 0;
        for signal in signals {
            if stopped() {
                tracing::trace!(
                    skipped = events.len() + 1 - fired,
                    "Monitor stopped, skipping notifications"
                );
                break;
            }
            signal.fire();
            fired += 1;
        }
        fired
    }
}
