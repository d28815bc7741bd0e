// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Folding partial reports into an accumulated baseline.
//!
//! Every sub-record declares which of its fields are nested sub-records,
//! atomic lists, or plain scalars; three generic routines do the actual work:
//!
//! - scalars are adopted when absent and overwritten when different
//! - lists are replaced as a whole when not structurally equal
//! - sub-records are merged field by field, and created only when that
//!   merge changes something
//!
//! A field that is absent from the incoming record never touches the baseline.

use super::{
    AmsReport, IpcamReport, OnlineReport, PrintReport, Report, TrayReport, UpgradeStateReport,
    UploadReport,
};

/// Types that can absorb a partial update of themselves.
pub trait Merge {
    /// Merges the fields present in `incoming` into `self`.
    ///
    /// Returns `true` if any field of `self` changed.
    fn merge_from(&mut self, incoming: &Self) -> bool;
}

/// Merges an incoming report into an accumulated baseline.
///
/// An absent baseline starts out empty. A report without a `print` payload
/// leaves the baseline untouched.
///
/// Returns the updated baseline and whether anything changed.
///
/// # Examples
///
/// ```
/// use bambu_monitor::report::{PrintReport, Report, merge};
///
/// let update = Report {
///     print: Some(PrintReport {
///         layer_num: Some(12),
///         ..PrintReport::default()
///     }),
/// };
///
/// let (baseline, changed) = merge(None, &update);
/// assert!(changed);
///
/// // Merging the same update again is a no-op
/// let (_, changed) = merge(Some(baseline), &update);
/// assert!(!changed);
/// ```
#[must_use]
pub fn merge(baseline: Option<Report>, incoming: &Report) -> (Report, bool) {
    let mut baseline = baseline.unwrap_or_default();
    let changed = baseline.merge_from(incoming);
    (baseline, changed)
}

impl Merge for Report {
    fn merge_from(&mut self, incoming: &Self) -> bool {
        merge_nested(&mut self.print, &incoming.print)
    }
}

/// Adopts `incoming` when the baseline has no value or a different one.
fn merge_scalar<T: PartialEq + Clone>(baseline: &mut Option<T>, incoming: &Option<T>) -> bool {
    let Some(value) = incoming else {
        return false;
    };
    match baseline {
        Some(current) if current == value => false,
        _ => {
            *baseline = Some(value.clone());
            true
        }
    }
}

/// Replaces the whole list unless it is structurally equal to the baseline.
///
/// An absent baseline list adopts the incoming one, even when it is empty.
fn merge_list<T: PartialEq + Clone>(
    baseline: &mut Option<Vec<T>>,
    incoming: &Option<Vec<T>>,
) -> bool {
    let Some(items) = incoming else {
        return false;
    };
    match baseline {
        Some(current) if current == items => false,
        Some(current) => {
            current.clone_from(items);
            true
        }
        None => {
            *baseline = Some(items.clone());
            true
        }
    }
}

/// Merges a sub-record field by field.
///
/// An absent baseline sub-record is only created when the incoming one
/// changes something, so an empty sub-record leaves the baseline as is.
fn merge_nested<T: Merge + Default>(baseline: &mut Option<T>, incoming: &Option<T>) -> bool {
    let Some(record) = incoming else {
        return false;
    };
    if let Some(current) = baseline {
        return current.merge_from(record);
    }
    let mut created = T::default();
    let changed = created.merge_from(record);
    if changed {
        *baseline = Some(created);
    }
    changed
}

/// Declares the merge field table of a sub-record.
///
/// Fields are merged in declaration order: sub-records first, then lists,
/// then scalars. Every field is visited; `changed` never short-circuits.
macro_rules! merge_table {
    (
        $ty:ty {
            nested: [$($nested:ident),* $(,)?],
            list: [$($list:ident),* $(,)?],
            scalar: [$($scalar:ident),* $(,)?] $(,)?
        }
    ) => {
        impl Merge for $ty {
            fn merge_from(&mut self, incoming: &Self) -> bool {
                let mut changed = false;
                $(changed |= merge_nested(&mut self.$nested, &incoming.$nested);)*
                $(changed |= merge_list(&mut self.$list, &incoming.$list);)*
                $(changed |= merge_scalar(&mut self.$scalar, &incoming.$scalar);)*
                changed
            }
        }
    };
}

merge_table!(PrintReport {
    nested: [ipcam, upload, upgrade_state, vt_tray, online, ams],
    list: [lights_report, filam_bak, hms, s_obj, stg],
    scalar: [
        ams_rfid_status,
        ams_status,
        bed_target_temper,
        bed_temper,
        big_fan1_speed,
        big_fan2_speed,
        cali_version,
        chamber_temper,
        command,
        cooling_fan_speed,
        fan_gear,
        force_upgrade,
        gcode_file,
        gcode_file_prepare_percent,
        gcode_state,
        heatbreak_fan_speed,
        home_flag,
        hw_switch_state,
        layer_num,
        lifecycle,
        mc_percent,
        mc_print_line_number,
        mc_print_stage,
        mc_print_sub_stage,
        mc_remaining_time,
        mess_production_state,
        msg,
        nozzle_diameter,
        nozzle_target_temper,
        nozzle_temper,
        nozzle_type,
        print_error,
        print_type,
        profile_id,
        project_id,
        queue_est,
        queue_number,
        queue_sts,
        queue_total,
        sdcard,
        sequence_id,
        spd_lvl,
        spd_mag,
        stg_cur,
        subtask_id,
        subtask_name,
        task_id,
        total_layer_num,
        wifi_signal,
    ],
});

merge_table!(IpcamReport {
    nested: [],
    list: [],
    scalar: [ipcam_dev, ipcam_record, resolution, timelapse, tutk_server, mode_bits],
});

merge_table!(UploadReport {
    nested: [],
    list: [],
    scalar: [status, progress, message],
});

merge_table!(UpgradeStateReport {
    nested: [],
    list: [new_ver_list],
    scalar: [
        sequence_id,
        progress,
        status,
        consistency_request,
        dis_state,
        err_code,
        force_upgrade,
        message,
        module,
        new_version_state,
        cur_state_code,
    ],
});

merge_table!(OnlineReport {
    nested: [],
    list: [],
    scalar: [ahb, rfid, version],
});

merge_table!(TrayReport {
    nested: [],
    list: [cols],
    scalar: [
        id,
        remain,
        k,
        n,
        cali_idx,
        tag_uid,
        tray_id_name,
        tray_info_idx,
        tray_type,
        tray_sub_brands,
        tray_color,
        tray_weight,
        tray_diameter,
        tray_temp,
        tray_time,
        bed_temp_type,
        bed_temp,
        nozzle_temp_max,
        nozzle_temp_min,
        xcam_info,
        tray_uuid,
        ctype,
    ],
});

merge_table!(AmsReport {
    nested: [],
    list: [ams],
    scalar: [
        ams_exist_bits,
        tray_exist_bits,
        tray_is_bbl_bits,
        tray_tar,
        tray_now,
        tray_pre,
        tray_read_done_bits,
        tray_reading_bits,
        version,
        insert_flag,
        power_on_flag,
    ],
});
