// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversions from raw report encodings to typed values.
//!
//! Every conversion is total: a value that cannot be interpreted becomes
//! `None`, never a zero or an error.

use std::time::Duration;

use crate::report::LightReport;

/// Highest value of the printer's fan speed scale.
const FAN_SCALE_MAX: f64 = 15.0;

/// Node name of the chamber light channel.
const CHAMBER_LIGHT_NODE: &str = "chamber_light";

/// Parses a numeric string.
pub(crate) fn parse_float(raw: Option<&str>) -> Option<f64> {
    raw?.parse().ok()
}

/// Converts a 0-15 fan speed string into a percentage.
pub(crate) fn fan_percent(raw: Option<&str>) -> Option<f64> {
    parse_float(raw).map(|speed| speed / FAN_SCALE_MAX * 100.0)
}

/// Maps `"enabled"` / `"disabled"` to a boolean.
pub(crate) fn enabled_flag(raw: Option<&str>) -> Option<bool> {
    match raw? {
        "enabled" => Some(true),
        "disabled" => Some(false),
        _ => None,
    }
}

/// Parses a signal strength such as `"-62dBm"`.
pub(crate) fn signal_dbm(raw: Option<&str>) -> Option<f64> {
    let raw = raw?;
    parse_float(Some(raw.strip_suffix("dBm").unwrap_or(raw)))
}

/// Converts a remaining time in minutes. Negative values are meaningless.
pub(crate) fn minutes(raw: Option<i64>) -> Option<Duration> {
    let minutes = u64::try_from(raw?).ok()?;
    Some(Duration::from_secs(minutes.saturating_mul(60)))
}

/// Finds the chamber light channel and maps its mode to a boolean.
///
/// The last matching channel wins. Channels without a node or mode are skipped.
pub(crate) fn chamber_light(lights: Option<&[LightReport]>) -> Option<bool> {
    let mode = lights?
        .iter()
        .rev()
        .filter_map(|light| Some((light.node.as_deref()?, light.mode.as_deref()?)))
        .find(|(node, _)| node.eq_ignore_ascii_case(CHAMBER_LIGHT_NODE))
        .map(|(_, mode)| mode)?;

    if mode.eq_ignore_ascii_case("on") {
        Some(true)
    } else if mode.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(node: Option<&str>, mode: Option<&str>) -> LightReport {
        LightReport {
            node: node.map(str::to_string),
            mode: mode.map(str::to_string),
        }
    }

    #[test]
    fn fan_percent_full_speed() {
        assert_eq!(fan_percent(Some("15")), Some(100.0));
        assert_eq!(fan_percent(Some("0")), Some(0.0));
    }

    #[test]
    fn fan_percent_partial_speed() {
        let percent = fan_percent(Some("8")).unwrap();
        assert!((percent - 53.333).abs() < 0.01);
    }

    #[test]
    fn fan_percent_unparsable_is_absent() {
        assert_eq!(fan_percent(Some("n/a")), None);
        assert_eq!(fan_percent(Some("")), None);
        assert_eq!(fan_percent(None), None);
    }

    #[test]
    fn parse_float_degrades_to_absent() {
        assert_eq!(parse_float(Some("0.4")), Some(0.4));
        assert_eq!(parse_float(Some("")), None);
        assert_eq!(parse_float(Some("1,75")), None);
    }

    #[test]
    fn enabled_flag_exact_match() {
        assert_eq!(enabled_flag(Some("enabled")), Some(true));
        assert_eq!(enabled_flag(Some("disabled")), Some(false));
        assert_eq!(enabled_flag(Some("Enabled")), None);
        assert_eq!(enabled_flag(Some("enable")), None);
        assert_eq!(enabled_flag(None), None);
    }

    #[test]
    fn signal_strips_unit() {
        assert_eq!(signal_dbm(Some("-62dBm")), Some(-62.0));
        assert_eq!(signal_dbm(Some("-70")), Some(-70.0));
        assert_eq!(signal_dbm(Some("dBm")), None);
        assert_eq!(signal_dbm(None), None);
    }

    #[test]
    fn minutes_to_duration() {
        assert_eq!(minutes(Some(147)), Some(Duration::from_secs(147 * 60)));
        assert_eq!(minutes(Some(0)), Some(Duration::ZERO));
        assert_eq!(minutes(Some(-1)), None);
        assert_eq!(minutes(None), None);
    }

    #[test]
    fn chamber_light_matches_case_insensitively() {
        let lights = [
            light(Some("work_light"), Some("on")),
            light(Some("Chamber_Light"), Some("OFF")),
        ];
        assert_eq!(chamber_light(Some(&lights)), Some(false));

        let lights = [light(Some("chamber_light"), Some("on"))];
        assert_eq!(chamber_light(Some(&lights)), Some(true));
    }

    #[test]
    fn chamber_light_unknown_mode_is_absent() {
        let lights = [light(Some("chamber_light"), Some("flashing"))];
        assert_eq!(chamber_light(Some(&lights)), None);
    }

    #[test]
    fn chamber_light_missing_channel_is_absent() {
        let lights = [light(Some("work_light"), Some("on")), light(None, Some("on"))];
        assert_eq!(chamber_light(Some(&lights)), None);
        assert_eq!(chamber_light(Some(&[])), None);
        assert_eq!(chamber_light(None), None);
    }

    #[test]
    fn chamber_light_last_match_wins() {
        let lights = [
            light(Some("chamber_light"), Some("on")),
            light(Some("chamber_light"), None),
            light(Some("chamber_light"), Some("off")),
        ];
        assert_eq!(chamber_light(Some(&lights)), Some(false));
    }
}
