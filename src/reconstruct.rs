//! Walks a solved label chain into the caller-facing schedule rows.

use crate::activity::Activity;
use crate::arena::LabelArena;
use crate::dssr::Solution;

/// One row of the reconstructed schedule, in chronological order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScheduleRow {
    pub act_id: usize,
    pub act_type: String,
    pub start_time_hours: f64,
    pub duration_intervals: u32,
    pub soc_start: f64,
    pub soc_end: f64,
    pub is_charging: bool,
    pub charge_mode: u8,
    pub charge_duration_hours: f64,
    pub charge_cost: f64,
    pub utility: f64,
    pub x: f64,
    pub y: f64,
}

/// Reconstructs the chronological schedule from a solved chain, per the
/// external-interface row layout. Rows sharing the same `(act_id,
/// start_time)` (which can happen when dominance keeps more than one label
/// resident for the same visit along the chain) are de-duplicated, keeping
/// the one with the largest duration.
pub fn reconstruct(solution: &Solution, activities: &[Activity], interval_minutes: f64) -> Vec<ScheduleRow> {
    let arena = &solution.arena;
    let mut chain_ids = Vec::new();
    let mut cur = Some(solution.best);
    while let Some(id) = cur {
        chain_ids.push(id);
        cur = arena.get(id).previous;
    }
    chain_ids.reverse();

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(chain_ids.len());
    for id in chain_ids {
        let label = arena.get(id);
        let act = &activities[label.act_id];
        let row = ScheduleRow {
            act_id: label.act_id,
            act_type: act.act_type.clone(),
            start_time_hours: label.start_time as f64 * interval_minutes / 60.0,
            duration_intervals: label.duration,
            soc_start: label.soc_at_activity_start,
            soc_end: label.current_soc,
            is_charging: label.charge_duration > 0,
            charge_mode: label.charge_mode.as_u8(),
            charge_duration_hours: label.charge_duration as f64 * interval_minutes / 60.0,
            charge_cost: label.current_charge_cost,
            utility: label.utility,
            x: act.x,
            y: act.y,
        };

        if let Some(last) = rows.last_mut() {
            if last.act_id == row.act_id && last.start_time_hours == row.start_time_hours {
                if row.duration_intervals > last.duration_intervals {
                    *last = row;
                }
                continue;
            }
        }
        rows.push(row);
    }

    rows
}

#[allow(dead_code)]
fn _assert_label_arena_outlives(_arena: &LabelArena) {}
