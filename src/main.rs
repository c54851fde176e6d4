use std::env;

use anyhow::Result;
use log::{error, info};
use rayon::ThreadPoolBuilder;

use ev_schedule_dp::csv_io;
use initialization::init;
use worker::{run, run_chain, run_sweep};

mod config;
mod initialization;
mod logging;
mod worker;

fn main() -> Result<()> {
    ThreadPoolBuilder::new().build_global()?;

    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            error!("Initialization failed: {e}");
            return Err(e);
        }
    };

    let mode = env::args().find(|a| a.starts_with("--mode="));
    let mode = mode.as_deref().and_then(|m| m.split_once('=')).map(|(_, v)| v).unwrap_or("single");

    match mode {
        "single" => run(&mgr, &config.files)?,
        "sweep" => {
            let n_runs = env::args()
                .find(|a| a.starts_with("--runs="))
                .and_then(|a| a.split_once('=').map(|(_, v)| v.to_string()))
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(50);
            let summary = run_sweep(&mgr, n_runs)?;
            info!(
                "Sweep of {n_runs} runs: best={:.3} median={:.3} worst={:.3} infeasible={}",
                summary.best_utility, summary.median_utility, summary.worst_utility, summary.infeasible_count
            );
            csv_io::write_schedule(&config.files.schedule_csv, &summary.best)?;
        }
        "chain" => {
            let n_days = env::args()
                .find(|a| a.starts_with("--days="))
                .and_then(|a| a.split_once('=').map(|(_, v)| v.to_string()))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(1);
            let days = run_chain(&mgr, n_days)?;
            for (i, rows) in days.iter().enumerate() {
                info!("Day {i}: {} activities, final utility {:.3}", rows.len(), rows.last().map(|r| r.utility).unwrap_or(0.0));
            }
        }
        other => {
            error!("unknown --mode={other}, expected single|sweep|chain");
        }
    }

    Ok(())
}
