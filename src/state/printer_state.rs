// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interpreted printer state.

use std::time::Duration;

use serde::Serialize;

use crate::report::{AmsReport, AmsUnitReport, PrintReport, Report, TrayReport};
use crate::types::{GcodeState, SpeedLevel};

use super::convert::{chamber_light, enabled_flag, fan_percent, minutes, parse_float, signal_dbm};

/// Typed view of a printer, derived from an accumulated [`Report`].
///
/// Every attribute is optional: `None` means the printer never reported it
/// (or reported something that could not be interpreted), while `Some(0)`,
/// `Some(false)` or `Some("")` are real values.
///
/// A `PrinterState` is never updated in place; it is recomputed from the
/// accumulated report with [`PrinterState::from_report`] after every change.
///
/// # Examples
///
/// ```
/// use bambu_monitor::report::decode_report;
/// use bambu_monitor::state::PrinterState;
/// use bambu_monitor::types::GcodeState;
///
/// let report = decode_report(
///     br#"{"print":{"gcode_state":"RUNNING","cooling_fan_speed":"15","spd_lvl":3}}"#,
/// )
/// .unwrap();
///
/// let state = PrinterState::from_report(&report);
/// assert_eq!(state.gcode.state, Some(GcodeState::Running));
/// assert_eq!(state.fans.part, Some(100.0));
/// assert_eq!(state.speed.level_name.map(|l| l.name()), Some("sport"));
/// assert!(state.bed.temperature.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrinterState {
    /// AMS filament changer.
    pub ams: Ams,
    /// Heated bed.
    pub bed: Bed,
    /// Camera settings.
    pub camera: Camera,
    /// Build chamber.
    pub chamber: Chamber,
    /// Job being printed.
    pub current_print: CurrentPrint,
    /// Fan speeds.
    pub fans: Fans,
    /// G-code execution.
    pub gcode: Gcode,
    /// Lighting.
    pub lights: Lights,
    /// Nozzle and hotend.
    pub nozzle: Nozzle,
    /// Print speed.
    pub speed: Speed,
    /// Firmware upgrade progress.
    pub upgrade_state: UpgradeState,
    /// File upload progress.
    pub upload: Upload,
    /// Slicer profile of the current job.
    pub profile_id: Option<String>,
    /// Project of the current job.
    pub project_id: Option<String>,
    /// Whether an SD card is inserted.
    pub sd_card: Option<bool>,
    /// Wi-Fi signal strength in dBm.
    pub wifi_signal: Option<f64>,
}

/// AMS metadata and contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ams {
    /// Whether the AMS is powered.
    pub powered: Option<bool>,
    /// Whether newly inserted spools are detected automatically.
    pub inserting: Option<bool>,
    /// RFID reader status code.
    pub rfid_status: Option<i64>,
    /// AMS protocol version.
    pub version: Option<i64>,
    /// Connected AMS units, in device order.
    ///
    /// Empty both when no units are connected and when the unit list was
    /// never reported.
    pub units: Vec<AmsUnit>,
    /// Spool on the external holder.
    pub external_spool: Option<AmsTray>,
}

/// A single AMS unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmsUnit {
    /// Unit identifier.
    pub id: Option<String>,
    /// Humidity level.
    pub humidity: Option<f64>,
    /// Temperature in °C.
    pub temperature: Option<f64>,
    /// Spool slots, in device order. Empty also when never reported.
    pub trays: Vec<AmsTray>,
}

/// One spool slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AmsTray {
    /// Slot identifier.
    pub id: Option<String>,
    /// Filament brand.
    pub brand: Option<String>,
    /// Filament color as RGBA hex.
    pub color: Option<String>,
    /// Filament material, e.g. `PLA`.
    pub kind: Option<String>,
    /// Filament preset name.
    pub name: Option<String>,
    /// Pressure advance factor.
    pub k: Option<f64>,
    /// Remaining filament in percent.
    pub remaining: Option<i64>,
    /// Filament diameter in mm.
    pub diameter: Option<f64>,
    /// Maximum nozzle temperature in °C.
    pub temp_max: Option<f64>,
    /// Minimum nozzle temperature in °C.
    pub temp_min: Option<f64>,
    /// Spool weight in grams.
    pub weight: Option<f64>,
}

/// Heated bed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bed {
    /// Current temperature in °C.
    pub temperature: Option<f64>,
    /// Target temperature in °C.
    pub temperature_target: Option<i64>,
}

/// Camera settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Camera {
    /// Whether recording is enabled.
    pub recording: Option<bool>,
    /// Recording resolution.
    pub resolution: Option<String>,
    /// Whether timelapse is enabled.
    pub timelapse: Option<bool>,
}

/// Build chamber.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chamber {
    /// Temperature in °C.
    pub temperature: Option<i64>,
}

/// Job being printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentPrint {
    /// Current layer.
    pub layer_number: Option<i64>,
    /// Total number of layers.
    pub layer_number_target: Option<i64>,
    /// Progress in percent.
    pub percent: Option<i64>,
    /// Estimated remaining time.
    pub remaining_time: Option<Duration>,
    /// Name of the job.
    pub subtask: Option<String>,
    /// Error code of the job (`0` when healthy).
    pub print_error: Option<i64>,
}

/// Fan speeds in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fans {
    /// Auxiliary part cooling fan.
    pub auxiliary: Option<f64>,
    /// Chamber exhaust fan.
    pub chamber: Option<f64>,
    /// Part cooling fan on the toolhead.
    pub part: Option<f64>,
    /// Hotend heatbreak fan.
    pub hotend: Option<f64>,
}

/// G-code execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Gcode {
    /// File being executed.
    pub file: Option<String>,
    /// Execution state.
    pub state: Option<GcodeState>,
}

/// Lighting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lights {
    /// Whether the chamber light is on.
    pub chamber: Option<bool>,
}

/// Nozzle and hotend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nozzle {
    /// Nozzle diameter in mm.
    pub diameter: Option<f64>,
    /// Current temperature in °C.
    pub temperature: Option<f64>,
    /// Target temperature in °C.
    pub temperature_target: Option<i64>,
    /// Nozzle material, e.g. `hardened_steel`.
    pub kind: Option<String>,
}

/// Print speed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Speed {
    /// Raw speed level.
    pub level: Option<i64>,
    /// Named preset for the level; `None` when the level is out of range.
    pub level_name: Option<SpeedLevel>,
    /// Speed magnitude in percent.
    pub magnitude: Option<i64>,
}

/// Firmware upgrade progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpgradeState {
    /// Error code of the upgrade.
    pub error_code: Option<i64>,
    /// Whether the upgrade is mandatory.
    pub force_upgrade: Option<bool>,
    /// Status message.
    pub message: Option<String>,
    /// Module being upgraded.
    pub module: Option<String>,
    /// Progress as reported.
    pub progress: Option<String>,
    /// Sequence number of the upgrade.
    pub sequence_id: Option<i64>,
    /// Upgrade status.
    pub status: Option<String>,
}

/// File upload progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Upload {
    /// Status message.
    pub message: Option<String>,
    /// Progress in percent.
    pub progress: Option<i64>,
    /// Upload status.
    pub status: Option<String>,
}

impl PrinterState {
    /// Interprets an accumulated report.
    ///
    /// This is a pure function: a report without a `print` payload yields a
    /// state where every attribute is absent.
    #[must_use]
    pub fn from_report(report: &Report) -> Self {
        let Some(print) = &report.print else {
            return Self::default();
        };

        Self {
            ams: Ams::from_print(print),
            bed: Bed {
                temperature: print.bed_temper,
                temperature_target: print.bed_target_temper,
            },
            camera: print.ipcam.as_ref().map_or_else(Camera::default, |ipcam| Camera {
                recording: enabled_flag(ipcam.ipcam_record.as_deref()),
                resolution: ipcam.resolution.clone(),
                timelapse: enabled_flag(ipcam.timelapse.as_deref()),
            }),
            chamber: Chamber {
                temperature: print.chamber_temper,
            },
            current_print: CurrentPrint {
                layer_number: print.layer_num,
                layer_number_target: print.total_layer_num,
                percent: print.mc_percent,
                remaining_time: minutes(print.mc_remaining_time),
                subtask: print.subtask_name.clone(),
                print_error: print.print_error,
            },
            fans: Fans {
                auxiliary: fan_percent(print.big_fan1_speed.as_deref()),
                chamber: fan_percent(print.big_fan2_speed.as_deref()),
                part: fan_percent(print.cooling_fan_speed.as_deref()),
                hotend: fan_percent(print.heatbreak_fan_speed.as_deref()),
            },
            gcode: Gcode {
                file: print.gcode_file.clone(),
                state: print.gcode_state.as_deref().map(GcodeState::from),
            },
            lights: Lights {
                chamber: chamber_light(print.lights_report.as_deref()),
            },
            nozzle: Nozzle {
                diameter: parse_float(print.nozzle_diameter.as_deref()),
                temperature: print.nozzle_temper,
                temperature_target: print.nozzle_target_temper,
                kind: print.nozzle_type.clone(),
            },
            speed: Speed {
                level: print.spd_lvl,
                level_name: print.spd_lvl.and_then(SpeedLevel::from_level),
                magnitude: print.spd_mag,
            },
            upgrade_state: print
                .upgrade_state
                .as_ref()
                .map_or_else(UpgradeState::default, |upgrade| UpgradeState {
                    error_code: upgrade.err_code,
                    force_upgrade: upgrade.force_upgrade,
                    message: upgrade.message.clone(),
                    module: upgrade.module.clone(),
                    progress: upgrade.progress.clone(),
                    sequence_id: upgrade.sequence_id,
                    status: upgrade.status.clone(),
                }),
            upload: print.upload.as_ref().map_or_else(Upload::default, |upload| Upload {
                message: upload.message.clone(),
                progress: upload.progress,
                status: upload.status.clone(),
            }),
            profile_id: print.profile_id.clone(),
            project_id: print.project_id.clone(),
            sd_card: print.sdcard,
            wifi_signal: signal_dbm(print.wifi_signal.as_deref()),
        }
    }

    /// Returns the g-code execution state, if known.
    #[must_use]
    pub fn gcode_state(&self) -> Option<&GcodeState> {
        self.gcode.state.as_ref()
    }

    /// Returns the error code of the current job, if known.
    #[must_use]
    pub fn print_error(&self) -> Option<i64> {
        self.current_print.print_error
    }
}

impl Ams {
    fn from_print(print: &PrintReport) -> Self {
        let mut ams = print.ams.as_ref().map_or_else(Self::default, Self::from_report);
        ams.rfid_status = print.ams_rfid_status;
        ams.external_spool = print.vt_tray.as_ref().map(AmsTray::from_report);
        ams
    }

    fn from_report(report: &AmsReport) -> Self {
        Self {
            powered: report.power_on_flag,
            inserting: report.insert_flag,
            rfid_status: None,
            version: report.version,
            units: report
                .ams
                .iter()
                .flatten()
                .map(AmsUnit::from_report)
                .collect(),
            external_spool: None,
        }
    }
}

impl AmsUnit {
    fn from_report(report: &AmsUnitReport) -> Self {
        Self {
            id: report.id.clone(),
            humidity: parse_float(report.humidity.as_deref()),
            temperature: parse_float(report.temp.as_deref()),
            trays: report
                .tray
                .iter()
                .flatten()
                .map(AmsTray::from_report)
                .collect(),
        }
    }
}

impl AmsTray {
    fn from_report(report: &TrayReport) -> Self {
        Self {
            id: report.id.clone(),
            brand: report.tray_sub_brands.clone(),
            color: report.tray_color.clone(),
            kind: report.tray_type.clone(),
            name: report.tray_id_name.clone(),
            k: report.k,
            remaining: report.remain,
            diameter: parse_float(report.tray_diameter.as_deref()),
            temp_max: parse_float(report.nozzle_temp_max.as_deref()),
            temp_min: parse_float(report.nozzle_temp_min.as_deref()),
            weight: parse_float(report.tray_weight.as_deref()),
        }
    }
}
