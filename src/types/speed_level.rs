// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Print speed presets.

use std::fmt;

/// Named print speed preset (`spd_lvl` 1-4).
///
/// # Examples
///
/// ```
/// use bambu_monitor::types::SpeedLevel;
///
/// assert_eq!(SpeedLevel::from_level(2), Some(SpeedLevel::Standard));
/// assert_eq!(SpeedLevel::Sport.name(), "sport");
/// assert_eq!(SpeedLevel::from_level(7), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SpeedLevel {
    /// Level 1.
    Silent,
    /// Level 2.
    Standard,
    /// Level 3.
    Sport,
    /// Level 4.
    Ludicrous,
}

impl SpeedLevel {
    /// Decodes a raw speed level. Values outside 1-4 have no name.
    #[must_use]
    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Silent),
            2 => Some(Self::Standard),
            3 => Some(Self::Sport),
            4 => Some(Self::Ludicrous),
            _ => None,
        }
    }

    /// Returns the raw level the printer uses for this preset.
    #[must_use]
    pub const fn level(&self) -> i64 {
        match self {
            Self::Silent => 1,
            Self::Standard => 2,
            Self::Sport => 3,
            Self::Ludicrous => 4,
        }
    }

    /// Returns the preset name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Silent => "silent",
            Self::Standard => "standard",
            Self::Sport => "sport",
            Self::Ludicrous => "ludicrous",
        }
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
