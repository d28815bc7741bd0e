// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! G-code execution state reported by the printer.

use std::fmt;

/// Execution state of the printer's g-code runner (`gcode_state`).
///
/// Values are matched exactly as the printer sends them. Anything not known
/// is kept verbatim in [`GcodeState::Other`].
///
/// # Examples
///
/// ```
/// use bambu_monitor::types::GcodeState;
///
/// let state = GcodeState::from("RUNNING");
/// assert_eq!(state, GcodeState::Running);
/// assert!(!state.is_idle_like());
///
/// assert!(GcodeState::from("FINISH").is_idle_like());
/// assert_eq!(GcodeState::from("HOMING").as_str(), "HOMING");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GcodeState {
    /// Nothing is printing.
    Idle,
    /// A job is being prepared.
    Prepare,
    /// A job is printing.
    Running,
    /// The current job is paused.
    Pause,
    /// The last job finished.
    Finish,
    /// The last job failed or was cancelled.
    Failed,
    /// A job is being sliced on the printer.
    Slicing,
    /// Any other value reported by the printer.
    Other(String),
}

impl GcodeState {
    /// Returns the raw string the printer uses for this state.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Prepare => "PREPARE",
            Self::Running => "RUNNING",
            Self::Pause => "PAUSE",
            Self::Finish => "FINISH",
            Self::Failed => "FAILED",
            Self::Slicing => "SLICING",
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` for states in which the printer is not actively printing
    /// (`IDLE`, `FAILED`, `FINISH`).
    #[must_use]
    pub fn is_idle_like(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed | Self::Finish)
    }

    /// Returns `true` if this is the `FINISH` state.
    #[must_use]
    pub fn is_finish(&self) -> bool {
        matches!(self, Self::Finish)
    }
}

impl From<&str> for GcodeState {
    fn from(raw: &str) -> Self {
        match raw {
            "IDLE" => Self::Idle,
            "PREPARE" => Self::Prepare,
            "RUNNING" => Self::Running,
            "PAUSE" => Self::Pause,
            "FINISH" => Self::Finish,
            "FAILED" => Self::Failed,
            "SLICING" => Self::Slicing,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GcodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for GcodeState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_states_parse() {
        assert_eq!(GcodeState::from("IDLE"), GcodeState::Idle);
        assert_eq!(GcodeState::from("PREPARE"), GcodeState::Prepare);
        assert_eq!(GcodeState::from("PAUSE"), GcodeState::Pause);
        assert_eq!(GcodeState::from("SLICING"), GcodeState::Slicing);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let state = GcodeState::from("idle");
        assert_eq!(state, GcodeState::Other("idle".to_string()));
        assert!(!state.is_idle_like());
    }

    #[test]
    fn idle_like_states() {
        assert!(GcodeState::Idle.is_idle_like());
        assert!(GcodeState::Failed.is_idle_like());
        assert!(GcodeState::Finish.is_idle_like());
        assert!(!GcodeState::Running.is_idle_like());
        assert!(!GcodeState::Pause.is_idle_like());
        assert!(!GcodeState::Other(String::new()).is_idle_like());
    }

    #[test]
    fn display_round_trips_raw_value() {
        for raw in ["IDLE", "RUNNING", "FINISH", "UNKNOWN_STATE"] {
            assert_eq!(GcodeState::from(raw).to_string(), raw);
        }
    }

    #[test]
    fn serializes_as_raw_string() {
        let json = serde_json::to_string(&GcodeState::Running).unwrap();
        assert_eq!(json, r#""RUNNING""#);
    }
}
