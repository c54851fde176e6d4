use anyhow::{anyhow, Result};
use log::info;
use rayon::prelude::*;

use ev_schedule_dp::csv_io::write_schedule;
use ev_schedule_dp::params::Parameters;
use ev_schedule_dp::reconstruct::ScheduleRow;
use ev_schedule_dp::solve_schedule;

use crate::config::Files;
use crate::initialization::Mgr;

/// Runs a single schedule solve and saves the result to the configured CSV
/// path.
///
/// # Arguments
///
/// * 'mgr' - struct with configured parameters and activity table
/// * 'files' - file paths config
pub fn run(mgr: &Mgr, files: &Files) -> Result<()> {
    let rows = solve_schedule(&mgr.params, &mgr.activities)
        .map_err(|e| anyhow!("solve failed: {e}"))?
        .map_err(|_| anyhow!("no feasible schedule reaches dusk for the configured parameters"))?;

    info!(
        "Schedule solved: {} activities visited, final utility {:.3}",
        rows.len(),
        rows.last().map(|r| r.utility).unwrap_or(0.0)
    );
    for row in &rows {
        info!(
            "{} start={:.2}h dur={} soc {:.3}->{:.3} cost={:.3}",
            row.act_type, row.start_time_hours, row.duration_intervals, row.soc_start, row.soc_end, row.charge_cost
        );
    }

    write_schedule(&files.schedule_csv, &rows)?;
    info!("Schedule saved to {}", files.schedule_csv);

    Ok(())
}

/// Summary of a random-initial-SOC sweep: best, median and worst final
/// utility across `n_runs` independent solves, each drawing its own initial
/// SOC from a distinct seed derived from the configured base seed.
pub struct SweepSummary {
    pub best: Vec<ScheduleRow>,
    pub best_utility: f64,
    pub median_utility: f64,
    pub worst_utility: f64,
    pub infeasible_count: usize,
}

/// Runs `n_runs` independent solves with random initial SOC (the fixed SOC
/// in `mgr.params`, if any, is ignored) and reports best/median/worst final
/// utility. Solves run in parallel via rayon, the same way the binary sizes
/// a thread pool for CPU-bound background work.
pub fn run_sweep(mgr: &Mgr, n_runs: u64) -> Result<SweepSummary> {
    let outcomes: Vec<Option<(f64, Vec<ScheduleRow>)>> = (0..n_runs)
        .into_par_iter()
        .map(|i| {
            let mut params = mgr.params.clone();
            params.fixed_initial_soc = None;
            params.rng_seed = mgr.params.rng_seed.wrapping_add(i).wrapping_mul(0x9E3779B97F4A7C15);

            match solve_schedule(&params, &mgr.activities) {
                Ok(Ok(rows)) => {
                    let utility = rows.last().map(|r| r.utility).unwrap_or(0.0);
                    Some((utility, rows))
                }
                _ => None,
            }
        })
        .collect();

    let infeasible_count = outcomes.iter().filter(|o| o.is_none()).count();
    let mut feasible: Vec<(f64, Vec<ScheduleRow>)> = outcomes.into_iter().flatten().collect();
    if feasible.is_empty() {
        return Err(anyhow!("every run in the sweep was infeasible"));
    }
    feasible.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let worst_utility = feasible.first().unwrap().0;
    let median_utility = feasible[feasible.len() / 2].0;
    let (best_utility, best) = feasible.pop().unwrap();

    Ok(SweepSummary { best, best_utility, median_utility, worst_utility, infeasible_count })
}

/// Chains `n_days` consecutive single-day solves, feeding each day's ending
/// SOC in as the next day's fixed initial SOC. Multi-day planning is
/// explicitly out of scope for the DP core itself; this is the thin
/// sequential driver the core's own contract assumes the caller provides.
pub fn run_chain(mgr: &Mgr, n_days: usize) -> Result<Vec<Vec<ScheduleRow>>> {
    let mut days = Vec::with_capacity(n_days);
    let mut params: Parameters = mgr.params.clone();

    for day in 0..n_days {
        let rows = solve_schedule(&params, &mgr.activities)
            .map_err(|e| anyhow!("solve failed on day {day}: {e}"))?
            .map_err(|_| anyhow!("day {day} is infeasible for the configured parameters"))?;

        params.fixed_initial_soc = rows.last().map(|r| r.soc_end);
        days.push(rows);
    }

    Ok(days)
}
