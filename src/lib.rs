//! Labelled dynamic programming engine for single-day EV activity
//! scheduling: a resource-constrained elementary shortest-path solver over
//! a time-expanded activity graph, with Pareto dominance pruning and
//! decremental state-space relaxation for elementarity.
//!
//! The public surface is deliberately narrow: install a [`params::Parameters`]
//! block and an [`activity::Activity`] table, call [`solve_schedule`], and
//! reconstruct rows from the result. Everything about CSV files, config
//! loading, multi-run sweeps, and multi-day chaining lives one layer up in
//! the CLI binary.

pub mod activity;
pub mod arena;
pub mod bucket;
pub mod csv_io;
pub mod dssr;
pub mod driver;
pub mod errors;
pub mod extension;
pub mod memory;
pub mod params;
pub mod reconstruct;
pub mod rng;

use activity::{validate_activities, Activity};
use errors::{EngineError, Infeasible};
use params::Parameters;
use reconstruct::ScheduleRow;

/// Runs one full DSSR-driven solve and returns the reconstructed schedule,
/// or `Ok(Err(Infeasible))` if no elementary path reaches dusk.
pub fn solve_schedule(params: &Parameters, activities: &[Activity]) -> Result<Result<Vec<ScheduleRow>, Infeasible>, EngineError> {
    params.validate()?;
    validate_activities(activities, params.horizon, params.group_utility.len())?;

    match dssr::solve(params, activities)? {
        Ok(solution) => {
            let rows = reconstruct::reconstruct(&solution, activities, params.interval_minutes);
            Ok(Ok(rows))
        }
        Err(infeasible) => Ok(Err(infeasible)),
    }
}
