// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Print lifecycle events and change notifications.
//!
//! [`detect`] compares two consecutive [`PrinterState`](crate::state::PrinterState)s
//! and reports the [`LifecycleEvent`]s between them. The [`UpdateBus`] holds
//! one [`Signal`] per event type, which the monitor fires after each change.
//!
//! # Examples
//!
//! ```
//! use bambu_monitor::event::{CANCELLED_ERROR_CODE, LifecycleEvent, detect};
//! use bambu_monitor::state::PrinterState;
//!
//! let mut state = PrinterState::default();
//! state.current_print.print_error = Some(CANCELLED_ERROR_CODE);
//!
//! // Reported on every update while the error code stays set
//! assert_eq!(detect(&state, Some(&state)), vec![LifecycleEvent::PrintCancelled]);
//! ```

mod lifecycle;
mod signal;
mod update_bus;

pub use lifecycle::{
    CANCELLED_ERROR_CODE, LifecycleEvent, detect, is_print_cancelled, is_print_finished,
    is_print_started,
};
pub use signal::Signal;
pub use update_bus::UpdateBus;
