// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Print lifecycle detection.

use std::fmt;

use crate::state::PrinterState;

/// Job error code the printer reports when a print was cancelled.
pub const CANCELLED_ERROR_CODE: i64 = 50_348_044;

/// A print lifecycle transition derived from two consecutive states.
///
/// # Examples
///
/// ```
/// use bambu_monitor::event::{LifecycleEvent, detect};
/// use bambu_monitor::state::PrinterState;
/// use bambu_monitor::types::GcodeState;
///
/// let mut previous = PrinterState::default();
/// previous.gcode.state = Some(GcodeState::Idle);
///
/// let mut current = PrinterState::default();
/// current.gcode.state = Some(GcodeState::Running);
///
/// assert_eq!(detect(&current, Some(&previous)), vec![LifecycleEvent::PrintStarted]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The printer went from an idle-like state to an active one.
    PrintStarted,
    /// The current job reports the cancellation error code.
    PrintCancelled,
    /// The printer entered the `FINISH` state.
    PrintFinished,
}

impl LifecycleEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrintStarted => "print_started",
            Self::PrintCancelled => "print_cancelled",
            Self::PrintFinished => "print_finished",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if the printer went from idle-like to active.
///
/// Both states must be known; an unknown previous state never counts as idle.
#[must_use]
pub fn is_print_started(current: &PrinterState, previous: Option<&PrinterState>) -> bool {
    let Some(previous) = previous.and_then(PrinterState::gcode_state) else {
        return false;
    };
    let Some(current) = current.gcode_state() else {
        return false;
    };

    previous.is_idle_like() && !current.is_idle_like()
}

/// Returns `true` if the printer just entered `FINISH`.
///
/// An unknown previous state counts as a transition.
#[must_use]
pub fn is_print_finished(current: &PrinterState, previous: Option<&PrinterState>) -> bool {
    if !current.gcode_state().is_some_and(|state| state.is_finish()) {
        return false;
    }

    !previous
        .and_then(PrinterState::gcode_state)
        .is_some_and(|state| state.is_finish())
}

/// Returns `true` while the current job reports [`CANCELLED_ERROR_CODE`].
///
/// This only looks at the current state, so it holds on every update until the
/// printer clears the error code.
#[must_use]
pub fn is_print_cancelled(current: &PrinterState) -> bool {
    current.print_error() == Some(CANCELLED_ERROR_CODE)
}

/// Derives the lifecycle events for a state change, in dispatch order
/// (started, cancelled, finished).
#[must_use]
pub fn detect(current: &PrinterState, previous: Option<&PrinterState>) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    if is_print_started(current, previous) {
        events.push(LifecycleEvent::PrintStarted);
    }
    if is_print_cancelled(current) {
        events.push(LifecycleEvent::PrintCancelled);
    }
    if is_print_finished(current, previous) {
        events.push(LifecycleEvent::PrintFinished);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GcodeState;

    fn with_gcode(state: Option<&str>) -> PrinterState {
        let mut printer = PrinterState::default();
        printer.gcode.state = state.map(GcodeState::from);
        printer
    }

    fn with_error(code: i64) -> PrinterState {
        let mut printer = PrinterState::default();
        printer.current_print.print_error = Some(code);
        printer
    }

    #[test]
    fn unknown_previous_does_not_start() {
        let previous = with_gcode(None);
        let current = with_gcode(Some("RUNNING"));

        assert!(!is_print_started(&current, Some(&previous)));
        assert!(!is_print_started(&current, None));
    }

    #[test]
    fn idle_to_running_starts() {
        let previous = with_gcode(Some("IDLE"));
        let current = with_gcode(Some("RUNNING"));

        assert!(is_print_started(&current, Some(&previous)));
        assert_eq!(
            detect(&current, Some(&previous)),
            vec![LifecycleEvent::PrintStarted]
        );
    }

    #[test]
    fn failed_to_idle_does_not_start() {
        let previous = with_gcode(Some("FAILED"));
        let current = with_gcode(Some("IDLE"));

        assert!(!is_print_started(&current, Some(&previous)));
        assert!(detect(&current, Some(&previous)).is_empty());
    }

    #[test]
    fn finish_to_prepare_starts() {
        let previous = with_gcode(Some("FINISH"));
        let current = with_gcode(Some("PREPARE"));

        assert!(is_print_started(&current, Some(&previous)));
    }

    #[test]
    fn unknown_previous_finishes() {
        let current = with_gcode(Some("FINISH"));

        assert!(is_print_finished(&current, None));
        assert!(is_print_finished(&current, Some(&with_gcode(None))));
    }

    #[test]
    fn running_to_finish_finishes_once() {
        let running = with_gcode(Some("RUNNING"));
        let finish = with_gcode(Some("FINISH"));

        assert_eq!(
            detect(&finish, Some(&running)),
            vec![LifecycleEvent::PrintFinished]
        );
        assert!(!is_print_finished(&finish, Some(&finish)));
        assert!(detect(&finish, Some(&finish)).is_empty());
    }

    #[test]
    fn not_finish_never_finishes() {
        assert!(!is_print_finished(&with_gcode(Some("IDLE")), None));
        assert!(!is_print_finished(&with_gcode(None), None));
    }

    #[test]
    fn cancellation_is_level_triggered() {
        let first = with_error(CANCELLED_ERROR_CODE);
        let second = with_error(CANCELLED_ERROR_CODE);

        assert_eq!(detect(&first, None), vec![LifecycleEvent::PrintCancelled]);
        assert_eq!(
            detect(&second, Some(&first)),
            vec![LifecycleEvent::PrintCancelled]
        );
    }

    #[test]
    fn other_error_codes_do_not_cancel() {
        assert!(!is_print_cancelled(&with_error(0)));
        assert!(!is_print_cancelled(&with_error(50_348_045)));
        assert!(!is_print_cancelled(&PrinterState::default()));
    }

    #[test]
    fn pause_produces_no_event() {
        let running = with_gcode(Some("RUNNING"));
        let paused = with_gcode(Some("PAUSE"));

        assert!(detect(&paused, Some(&running)).is_empty());
        assert!(detect(&running, Some(&paused)).is_empty());
    }

    #[test]
    fn events_keep_dispatch_order() {
        let mut previous = with_gcode(Some("IDLE"));
        previous.current_print.print_error = Some(0);

        let mut current = with_gcode(Some("FINISH"));
        current.current_print.print_error = Some(CANCELLED_ERROR_CODE);

        // FINISH is idle-like, so no start
        assert_eq!(
            detect(&current, Some(&previous)),
            vec![LifecycleEvent::PrintCancelled, LifecycleEvent::PrintFinished]
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(LifecycleEvent::PrintStarted.to_string(), "print_started");
        assert_eq!(LifecycleEvent::PrintCancelled.to_string(), "print_cancelled");
        assert_eq!(LifecycleEvent::PrintFinished.to_string(), "print_finished");
    }
}
