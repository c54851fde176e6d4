//! The extension operator: turns one resident label into zero or more
//! successor labels in neighbouring buckets.
//!
//! This is the combinatorial core of the engine. To keep the label count
//! tractable the timing and charging choices are enumerated over a small set
//! of canonical points rather than every integer interval, exactly as the
//! design notes permit: canonical timing points are guaranteed to cover the
//! corners of the piecewise-linear utility surface, and canonical charge
//! durations are guaranteed to cover the Pareto frontier once dominance
//! prunes the rest.

use std::collections::HashSet;

use crate::activity::{Activity, ChargeMode};
use crate::arena::{Label, LabelArena, LabelId};
use crate::bucket::BucketStore;
use crate::errors::ResourceError;
use crate::params::Parameters;
use crate::rng::utility_error;

/// Euclidean distance between two activities, in meters.
fn distance_m(a: &Activity, b: &Activity) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn travel_time_intervals(distance_m: f64, params: &Parameters) -> u32 {
    (distance_m / params.speed_m_per_interval).ceil().max(0.0) as u32
}

fn travel_soc_cost(distance_m: f64, params: &Parameters) -> f64 {
    let km = distance_m / 1000.0;
    (km * params.energy_consumption_kwh_per_km) / params.battery_capacity_kwh
}

/// Candidate (start, duration) pairs at `b`, covering the corners of its
/// piecewise-linear timing/duration utility surface. `is_dusk` identifies
/// `b` as the table's fixed dusk anchor (activity id `N-1`), not merely a
/// home visit that happens to share dusk's `latest_start`: home (group 0)
/// may repeat, so an intermediate home visit must never be mistaken for
/// dusk and forced to run to the horizon.
fn timing_candidates(b: &Activity, earliest_arrival: u32, horizon: u32, is_dusk: bool) -> Vec<(u32, u32)> {
    let lo_start = earliest_arrival.max(b.earliest_start);
    if lo_start > b.latest_start {
        return Vec::new();
    }

    if is_dusk {
        // Dusk's duration is fully determined by arrival time: it must run
        // to exactly the horizon, so the start is the only free choice.
        let duration = horizon - lo_start;
        if duration < b.min_duration || duration > b.max_duration {
            return Vec::new();
        }
        return vec![(lo_start, duration)];
    }

    let mut starts: Vec<u32> = vec![lo_start, b.latest_start];
    if b.des_start >= lo_start && b.des_start <= b.latest_start {
        starts.push(b.des_start);
    }
    starts.sort_unstable();
    starts.dedup();

    let mut durations: Vec<u32> = vec![b.min_duration, b.max_duration];
    if b.des_duration >= b.min_duration && b.des_duration <= b.max_duration {
        durations.push(b.des_duration);
    }
    durations.sort_unstable();
    durations.dedup();

    let mut out = Vec::new();
    for &s in &starts {
        for &d in &durations {
            if s + d > horizon {
                continue;
            }
            out.push((s, d));
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

/// Candidate in-activity charge durations at `b`, given the chosen
/// `duration_b`. Covers "no charging", "charge the whole visit", and
/// "charge exactly to full" per the design notes' reduced enumeration.
fn charge_duration_candidates(b: &Activity, duration_b: u32, soc_on_arrival: f64, params: &Parameters) -> Vec<u32> {
    if !b.is_charging {
        return vec![0];
    }
    if b.is_service_station {
        return vec![duration_b];
    }

    let speed_idx = match b.charge_mode.speed_index() {
        Some(i) => i,
        None => return vec![0],
    };
    let power = params.charger_speeds[speed_idx].power_kw;
    let interval_h = params.interval_minutes / 60.0;
    let soc_per_interval = power * interval_h / params.battery_capacity_kwh;

    let mut candidates = vec![0u32, duration_b];
    if soc_per_interval > 0.0 {
        let needed = ((1.0 - soc_on_arrival) / soc_per_interval).ceil().max(0.0) as u32;
        candidates.push(needed.min(duration_b));
    }
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

fn utility_increment(
    group: &crate::params::GroupUtility,
    start_b: u32,
    duration_b: u32,
    b: &Activity,
    travel_time: u32,
    charge_cost_increment: f64,
    params: &Parameters,
    seed: u64,
    a_id: usize,
    b_id: usize,
) -> f64 {
    let mut u = group.asc;

    if start_b < b.des_start {
        u += group.early * (b.des_start - start_b) as f64;
    } else if start_b > b.des_start {
        u += group.late * (start_b - b.des_start) as f64;
    }

    if duration_b < b.des_duration {
        u += group.short * (b.des_duration - duration_b) as f64;
    } else if duration_b > b.des_duration {
        u += group.long * (duration_b - b.des_duration) as f64;
    }

    u += params.travel_time_penalty * travel_time as f64;
    u -= charge_cost_increment * params.charge_cost_utility_weight();
    u += utility_error(seed, a_id, b_id, start_b, duration_b, params.utility_error_std_dev);

    u
}

/// Extends the resident label `label_id` at `(act_id, time)`, inserting any
/// feasible successor labels into `store`. `forbidden` is the DSSR
/// controller's current set of banned activity ids.
pub fn extend(
    arena: &mut LabelArena,
    store: &mut BucketStore,
    params: &Parameters,
    activities: &[Activity],
    label_id: LabelId,
    forbidden: &HashSet<usize>,
) -> Result<(), ResourceError> {
    let label = arena.get(label_id).clone();
    let a = &activities[label.act_id];

    for b in activities.iter() {
        if b.id == a.id {
            continue;
        }
        if !b.is_home() && label.mem.contains(b.group) {
            continue;
        }
        if forbidden.contains(&b.id) {
            continue;
        }

        let dist = distance_m(a, b);
        let travel_time = travel_time_intervals(dist, params);
        let soc_travel_cost = travel_soc_cost(dist, params);

        let t_arr = label.time + travel_time;
        if t_arr > b.latest_start || t_arr > params.horizon {
            continue;
        }

        let soc_after_travel = label.current_soc - soc_travel_cost;
        if soc_after_travel < 0.0 {
            continue;
        }

        let group = match params.group(b.group) {
            Some(g) => g,
            None => continue,
        };

        let is_dusk = b.id == activities.len() - 1;

        for (start_b, duration_b) in timing_candidates(b, t_arr, params.horizon, is_dusk) {
            for charge_duration in charge_duration_candidates(b, duration_b, soc_after_travel, params) {
                let (delta_soc, charge_cost_increment, charge_mode) = if b.is_charging && charge_duration > 0 {
                    let speed_idx = match b.charge_mode.speed_index() {
                        Some(i) => i,
                        None => continue,
                    };
                    let speed = params.charger_speeds[speed_idx];
                    let interval_h = params.interval_minutes / 60.0;
                    let energy_kwh_requested = speed.power_kw * charge_duration as f64 * interval_h;
                    let delta_requested = energy_kwh_requested / params.battery_capacity_kwh;
                    // Top off and stop rather than reject: §4.6 caps delta_soc so
                    // soc_after <= 1, it never discards the visit for overshooting.
                    let delta = delta_requested.min((1.0 - soc_after_travel).max(0.0));
                    let energy_kwh_actual = delta * params.battery_capacity_kwh;
                    let tariff = if b.charge_mode.is_free() { 0.0 } else { speed.tariff_per_kwh };
                    (delta, tariff * energy_kwh_actual, b.charge_mode)
                } else {
                    (0.0, 0.0, ChargeMode::None)
                };

                let soc_final_unclamped = soc_after_travel + delta_soc;
                if soc_final_unclamped < 0.0 {
                    continue;
                }
                let current_soc = soc_final_unclamped.clamp(0.0, 1.0);

                let deviation_start = (start_b as i64 - b.des_start as i64).unsigned_abs() as f64;
                let deviation_dur = (duration_b as i64 - b.des_duration as i64).unsigned_abs() as f64;

                let u_inc = utility_increment(
                    group,
                    start_b,
                    duration_b,
                    b,
                    travel_time,
                    charge_cost_increment,
                    params,
                    params.rng_seed,
                    a.id,
                    b.id,
                );
                if !u_inc.is_finite() {
                    continue;
                }

                let new_label = Label {
                    act_id: b.id,
                    time: start_b + duration_b,
                    start_time: start_b,
                    duration: duration_b,
                    deviation_start,
                    deviation_dur,
                    soc_at_activity_start: soc_after_travel,
                    current_soc,
                    delta_soc,
                    charge_duration,
                    charge_mode,
                    charge_cost_at_activity_start: label.current_charge_cost,
                    current_charge_cost: label.current_charge_cost + charge_cost_increment,
                    utility: label.utility + u_inc,
                    mem: label.mem.extend(b.group),
                    previous: Some(label_id),
                };

                let time = new_label.time;
                let new_id = arena.alloc(new_label)?;
                store.try_insert(arena, new_id, b.id, time);
            }
        }
    }

    Ok(())
}
