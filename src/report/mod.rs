// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw printer reports as published on `device/<serial>/report`.
//!
//! The printer only reports what changed since its previous message, so every
//! leaf of a [`Report`] is an [`Option`]: `None` means "not reported in this
//! message", which is different from a reported zero, empty string or `false`.
//! Reports are folded into an accumulated baseline with [`merge`], which
//! reconstructs the full device state over time.
//!
//! # Examples
//!
//! ```
//! use bambu_monitor::report::{decode_report, merge};
//!
//! let first = decode_report(br#"{"print":{"gcode_state":"IDLE","mc_percent":0}}"#).unwrap();
//! let second = decode_report(br#"{"print":{"mc_percent":0}}"#).unwrap();
//!
//! let (baseline, changed) = merge(None, &first);
//! assert!(changed);
//!
//! // Nothing new in the second report
//! let (baseline, changed) = merge(Some(baseline), &second);
//! assert!(!changed);
//! assert_eq!(baseline.print.unwrap().gcode_state.as_deref(), Some("IDLE"));
//! ```

mod merge;

pub use merge::{Merge, merge};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;

/// A single report message from the printer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    /// Printer status payload. Reports without it carry nothing to merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<PrintReport>,
}

/// The `print` payload of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintReport {
    // Sub-records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ams: Option<AmsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipcam: Option<IpcamReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lights_report: Option<Vec<LightReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<OnlineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_state: Option<UpgradeStateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload: Option<UploadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vt_tray: Option<TrayReport>,

    // Scalars and lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ams_rfid_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ams_status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_target_temper: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_temper: Option<f64>,
    /// Auxiliary fan speed on the 0-15 device scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_fan1_speed: Option<String>,
    /// Chamber fan speed on the 0-15 device scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_fan2_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cali_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chamber_temper: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Part cooling fan speed on the 0-15 device scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooling_fan_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_gear: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filam_bak: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcode_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcode_file_prepare_percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcode_state: Option<String>,
    /// Hotend heatbreak fan speed on the 0-15 device scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatbreak_fan_speed: Option<String>,
    /// Health management (diagnostic) codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hms: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_flag: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_switch_state: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_num: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_print_line_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_print_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_print_sub_stage: Option<i64>,
    /// Remaining print time in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mc_remaining_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mess_production_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_diameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_target_temper: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_temper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_error: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_est: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_sts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_obj: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sdcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spd_lvl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spd_mag: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stg: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stg_cur: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_layer_num: Option<i64>,
    /// Signal strength with a unit suffix, e.g. `"-62dBm"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_signal: Option<String>,
}

/// Camera settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcamReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipcam_dev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipcam_record: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelapse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutk_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_bits: Option<i64>,
}

/// File upload progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Firmware upgrade progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeStateReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency_request: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dis_state: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_upgrade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_version_state: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cur_state_code: Option<i64>,
    /// Firmware versions available per module.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_ver_list: Option<Vec<Value>>,
}

/// Online status of optional modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rfid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// A filament spool slot, either inside an AMS unit or the external spool
/// holder (`vt_tray`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remain: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cali_idx: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_id_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_info_idx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_sub_brands: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_diameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_temp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_temp_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_temp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_temp_max: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nozzle_temp_min: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcam_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctype: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<Vec<String>>,
}

/// One AMS unit and its trays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmsUnitReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray: Option<Vec<TrayReport>>,
}

/// The AMS (automatic material system) block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmsReport {
    /// Connected units. Always replaced as a whole.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ams: Option<Vec<AmsUnitReport>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ams_exist_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_exist_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_is_bbl_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_tar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_now: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_pre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_read_done_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_reading_bits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_on_flag: Option<bool>,
}

/// A named light channel and its mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightReport {
    /// Channel name, e.g. `chamber_light`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Channel mode, e.g. `on` or `off`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Decodes a raw report payload.
///
/// Unknown fields are ignored, and missing fields stay `None`.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the payload is not a JSON object matching
/// the report shape.
///
/// # Examples
///
/// ```
/// use bambu_monitor::report::decode_report;
///
/// let report = decode_report(br#"{"print":{"sdcard":false}}"#).unwrap();
/// assert_eq!(report.print.unwrap().sdcard, Some(false));
/// ```
pub fn decode_report(payload: &[u8]) -> Result<Report, ParseError> {
    serde_json::from_slice(payload).map_err(ParseError::Json)
}
