// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best-effort notification signal.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::sync::futures::Notified;

/// An empty, best-effort notification.
///
/// Firing a signal wakes every task currently waiting on it, not just one:
/// each waiter observes each occurrence once. Nothing is buffered: a signal
/// fired while nobody waits is lost, and firing never blocks the caller.
/// Consumers that must handle an occurrence exactly once should wait from a
/// single task.
///
/// To avoid missing a notification between checking state and starting to
/// wait, create the [`Notified`] future first with [`Signal::notified`], then
/// await it.
///
/// # Examples
///
/// ```
/// use bambu_monitor::Monitor;
///
/// # async fn example(monitor: &Monitor) {
/// let updated = monitor.updated().notified();
/// // ... hand records to the monitor ...
/// updated.await;
/// let state = monitor.current_state();
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signal {
    notify: Arc<Notify>,
}

impl Signal {
    /// Creates a new signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wakes all current waiters. Dropped if there are none.
    pub(crate) fn fire(&self) {
        self.notify.notify_waiters();
    }

    /// Waits for the next time the signal fires.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }

    /// Registers interest in the next firing.
    ///
    /// The returned future completes on the first firing after this call,
    /// even if it is polled later.
    #[must_use]
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }
}
