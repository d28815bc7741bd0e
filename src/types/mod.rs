// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types decoded from raw printer fields.
//!
//! # Types
//!
//! - [`GcodeState`] - Execution state of the g-code runner (`IDLE`, `RUNNING`, ...)
//! - [`SpeedLevel`] - Named print speed preset (silent, standard, sport, ludicrous)

mod gcode_state;
mod speed_level;

pub use gcode_state::GcodeState;
pub use speed_level::SpeedLevel;
