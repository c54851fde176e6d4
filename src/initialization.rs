use std::env;

use anyhow::Result;
use log::info;

use ev_schedule_dp::activity::Activity;
use ev_schedule_dp::csv_io::load_activities;
use ev_schedule_dp::params::Parameters;

use crate::config::{load_config, Config};
use crate::logging::setup_logger;

/// Bundles everything a run needs once the configuration file and activity
/// table have been loaded.
pub struct Mgr {
    pub params: Parameters,
    pub activities: Vec<Activity>,
}

/// Initializes logging and loads configuration plus the activity table,
/// returning a [`Mgr`] ready to hand to [`crate::worker::run`].
pub fn init() -> Result<(Config, Mgr)> {
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .find(|p| p.starts_with("--config="))
        .expect("config file argument should be present");
    let config_path = config_path.split_once('=').expect("config file argument should be correct").1;

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting ev_schedule_dp version: {}", env!("CARGO_PKG_VERSION"));

    let params = config.to_parameters();
    let activities = load_activities(&config.files.activities_csv)?;

    let mgr = Mgr { params, activities };

    Ok((config, mgr))
}
