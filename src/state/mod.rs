// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed printer state interpreted from accumulated reports.
//!
//! The raw [`Report`] keeps the printer's wire encodings (fan speeds on a
//! 0-15 scale, numbers in strings, `"enabled"` flags). [`PrinterState`]
//! converts them into plain values. Anything that cannot be interpreted is
//! left absent instead of failing.
//!
//! # Examples
//!
//! ```
//! use bambu_monitor::report::decode_report;
//! use bambu_monitor::state::interpret;
//!
//! let report = decode_report(br#"{"print":{"wifi_signal":"-58dBm","sdcard":true}}"#).unwrap();
//! let state = interpret(&report);
//!
//! assert_eq!(state.wifi_signal, Some(-58.0));
//! assert_eq!(state.sd_card, Some(true));
//! ```

mod convert;
mod printer_state;

pub use printer_state::{
    Ams, AmsTray, AmsUnit, Bed, Camera, Chamber, CurrentPrint, Fans, Gcode, Lights, Nozzle,
    PrinterState, Speed, UpgradeState, Upload,
};

use crate::report::Report;

/// Interprets an accumulated report into a [`PrinterState`].
///
/// Shorthand for [`PrinterState::from_report`].
#[must_use]
pub fn interpret(report: &Report) -> PrinterState {
    PrinterState::from_report(report)
}
