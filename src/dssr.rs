//! The DSSR (decremental state-space relaxation) controller.
//!
//! Dominance alone does not guarantee an elementary path: a surviving label
//! can carry a visited-group subset that masks a revisit further down the
//! chain. DSSR restores elementarity lazily by re-solving with specific
//! activities hard-forbidden whenever the current best dusk label turns out
//! to revisit a non-home group.

use std::collections::{HashMap, HashSet};

use crate::activity::Activity;
use crate::arena::{Label, LabelArena, LabelId};
use crate::bucket::BucketStore;
use crate::driver::run_dp;
use crate::errors::{EngineError, Infeasible};
use crate::params::Parameters;
use crate::rng::draw_initial_soc;

/// One resolved schedule: the best elementary dusk label together with the
/// arena that owns its predecessor chain. The arena must outlive any
/// reconstruction of the label chain.
pub struct Solution {
    pub arena: LabelArena,
    pub best: LabelId,
}

/// Runs the DSSR-driven DP loop to completion: repeated solves, each one
/// forbidding one more activity, until the best dusk label is elementary in
/// non-home groups or no feasible label reaches dusk.
pub fn solve(params: &Parameters, activities: &[Activity]) -> Result<Result<Solution, Infeasible>, EngineError> {
    let dusk_id = activities.len() - 1;
    let mut forbidden: HashSet<usize> = HashSet::new();

    loop {
        let mut arena = LabelArena::new();
        let mut store = BucketStore::new(activities.len(), params.horizon as usize);

        let initial_soc = params.fixed_initial_soc.unwrap_or_else(|| draw_initial_soc(params.rng_seed));
        // Dawn is itself a chosen activity (home), so its participation
        // constant counts toward cumulative utility just like every other
        // visit's asc[group] term; otherwise the objective undercounts by
        // one asc[home] relative to the reconstructed chain.
        let home_asc = params.group(0).map(|g| g.asc).unwrap_or(0.0);
        let seed = Label {
            act_id: 0,
            time: 0,
            start_time: 0,
            duration: 0,
            deviation_start: 0.0,
            deviation_dur: 0.0,
            soc_at_activity_start: initial_soc,
            current_soc: initial_soc,
            delta_soc: 0.0,
            charge_duration: 0,
            charge_mode: crate::activity::ChargeMode::None,
            charge_cost_at_activity_start: 0.0,
            current_charge_cost: 0.0,
            utility: home_asc,
            mem: crate::memory::GroupMemory::empty(),
            previous: None,
        };
        let seed_id = arena.alloc(seed)?;
        store.try_insert(&arena, seed_id, 0, 0);

        run_dp(&mut arena, &mut store, params, activities, &forbidden)?;

        let best = best_dusk_label(&arena, &store, dusk_id, params.horizon);
        let Some(best_id) = best else {
            return Ok(Err(Infeasible));
        };

        match first_group_repeat(&arena, best_id, activities) {
            None => return Ok(Ok(Solution { arena, best: best_id })),
            Some(repeat_act_id) => {
                if !forbidden.insert(repeat_act_id) {
                    // already forbidden and still repeating: no further progress possible
                    return Ok(Err(Infeasible));
                }
                log::debug!("DSSR: forbidding activity {repeat_act_id} after group repeat, re-solving");
            }
        }
    }
}

fn best_dusk_label(arena: &LabelArena, store: &BucketStore, dusk_id: usize, horizon: u32) -> Option<LabelId> {
    store
        .cell(dusk_id, horizon)
        .iter()
        .copied()
        .max_by(|&a, &b| {
            arena.get(a).utility.partial_cmp(&arena.get(b).utility).unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Walks the predecessor chain of `best_id` from dusk back to dawn and
/// returns the activity id of the *first* occurrence of the earliest
/// non-home group that turns out to repeat, or `None` if the chain is
/// already elementary.
fn first_group_repeat(arena: &LabelArena, best_id: LabelId, activities: &[Activity]) -> Option<usize> {
    let mut chain = Vec::new();
    let mut cur = Some(best_id);
    while let Some(id) = cur {
        let label = arena.get(id);
        chain.push(label.act_id);
        cur = label.previous;
    }
    chain.reverse();

    let mut first_seen: HashMap<u8, usize> = HashMap::new();
    for &act_id in &chain {
        let group = activities[act_id].group;
        if group == 0 {
            continue;
        }
        if let Some(&earlier_act_id) = first_seen.get(&group) {
            return Some(earlier_act_id);
        }
        first_seen.insert(group, act_id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ChargeMode;
    use crate::params::{ChargerSpeed, GroupUtility};

    fn activity(id: usize, group: u8, earliest: u32, latest: u32, min_d: u32, max_d: u32, des_s: u32, des_d: u32) -> Activity {
        Activity {
            id,
            act_type: format!("act{id}"),
            x: id as f64 * 1000.0,
            y: 0.0,
            group,
            earliest_start: earliest,
            latest_start: latest,
            min_duration: min_d,
            max_duration: max_d,
            des_start: des_s,
            des_duration: des_d,
            charge_mode: ChargeMode::None,
            is_charging: false,
            is_service_station: false,
        }
    }

    fn base_params(horizon: u32, groups: usize) -> Parameters {
        Parameters {
            horizon,
            interval_minutes: 5.0,
            speed_m_per_interval: 500.0,
            travel_time_penalty: -0.01,
            group_utility: (0..groups)
                .map(|_| GroupUtility { asc: 1.0, early: -0.01, late: -0.01, short: -0.01, long: -0.01 })
                .collect(),
            charger_speeds: [
                ChargerSpeed { power_kw: 7.0, tariff_per_kwh: 2.0 },
                ChargerSpeed { power_kw: 22.0, tariff_per_kwh: 2.0 },
                ChargerSpeed { power_kw: 50.0, tariff_per_kwh: 2.0 },
            ],
            battery_capacity_kwh: 60.0,
            energy_consumption_kwh_per_km: 0.2,
            utility_error_std_dev: 0.0,
            fixed_initial_soc: Some(0.8),
            rng_seed: 1,
        }
    }

    #[test]
    fn single_home_day_solves() {
        let acts = vec![activity(0, 0, 0, 0, 0, 288, 0, 0), activity(1, 0, 0, 288, 1, 288, 0, 1)];
        let params = base_params(288, 1);
        let result = solve(&params, &acts).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn group_repeat_is_forbidden_until_elementary() {
        let mut acts = vec![activity(0, 0, 0, 0, 0, 288, 0, 0)];
        for i in 0..3 {
            acts.push(activity(1 + i, 1, 0, 280, 1, 5, 50 + i * 10, 2));
        }
        acts.push(activity(4, 0, 0, 288, 1, 288, 280, 1));
        let params = base_params(288, 2);
        let result = solve(&params, &acts).unwrap().unwrap();
        let mut cur = Some(result.best);
        let mut group_1_visits = 0;
        while let Some(id) = cur {
            let label = result.arena.get(id);
            if acts[label.act_id].group == 1 {
                group_1_visits += 1;
            }
            cur = label.previous;
        }
        assert!(group_1_visits <= 1);
    }
}
