//! CSV adapters for the activity table and the reconstructed schedule.
//!
//! These are thin I/O boundaries, not part of the DP core: the engine
//! itself only ever sees `Activity`/`ScheduleRow` values.

use std::path::Path;

use serde::Deserialize;

use crate::activity::{Activity, ChargeMode};
use crate::errors::CsvError;
use crate::reconstruct::ScheduleRow;

/// Raw CSV row shape for the activity input layout: `group` is 1-indexed on
/// disk (1..G) and mapped down to the internal 0..G-1 space here, with
/// group 0 reserved for home.
#[derive(Debug, Deserialize)]
struct ActivityRow {
    id: usize,
    act_type: String,
    x: f64,
    y: f64,
    group: u8,
    earliest_start: u32,
    latest_start: u32,
    min_duration: u32,
    max_duration: u32,
    des_start_time: u32,
    des_duration: u32,
    charge_mode: u8,
    is_charging: u8,
    is_service_station: u8,
}

/// Loads the activity table from a CSV file at `path`. Rows must already be
/// in id order; dawn/dusk placement is checked by
/// [`crate::activity::validate_activities`], not here.
pub fn load_activities(path: impl AsRef<Path>) -> Result<Vec<Activity>, CsvError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut activities = Vec::new();

    for (row_idx, record) in reader.deserialize::<ActivityRow>().enumerate() {
        let row = record?;
        let charge_mode = ChargeMode::from_u8(row.charge_mode)
            .ok_or_else(|| CsvError::BadRow(row_idx, format!("unknown charge_mode {}", row.charge_mode)))?;

        activities.push(Activity {
            id: row.id,
            act_type: row.act_type,
            x: row.x,
            y: row.y,
            group: row.group.saturating_sub(1),
            earliest_start: row.earliest_start,
            latest_start: row.latest_start,
            min_duration: row.min_duration,
            max_duration: row.max_duration,
            des_start: row.des_start_time,
            des_duration: row.des_duration,
            charge_mode,
            is_charging: row.is_charging != 0,
            is_service_station: row.is_service_station != 0,
        });
    }

    Ok(activities)
}

/// Writes the reconstructed schedule to a CSV file at `path`, one row per
/// activity visit in chronological order, per the external schedule output
/// layout.
pub fn write_schedule(path: impl AsRef<Path>, rows: &[ScheduleRow]) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
