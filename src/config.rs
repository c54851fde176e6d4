use std::fs;

use log::LevelFilter;
use serde::Deserialize;

use ev_schedule_dp::errors::ConfigError;
use ev_schedule_dp::params::{ChargerSpeed, GroupUtility, Parameters};

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Horizon {
    pub intervals: u32,
    pub interval_minutes: f64,
}

#[derive(Deserialize)]
pub struct Travel {
    pub speed_kmh: f64,
    pub travel_time_penalty: f64,
}

#[derive(Deserialize, Clone)]
pub struct GroupCoefficients {
    pub asc: f64,
    pub early: f64,
    pub late: f64,
    pub short: f64,
    pub long: f64,
}

#[derive(Deserialize)]
pub struct Charging {
    pub slow_kw: f64,
    pub fast_kw: f64,
    pub rapid_kw: f64,
    pub slow_tariff_per_kwh: f64,
    pub fast_tariff_per_kwh: f64,
    pub rapid_tariff_per_kwh: f64,
}

#[derive(Deserialize)]
pub struct Battery {
    pub capacity_kwh: f64,
    pub consumption_kwh_per_km: f64,
}

#[derive(Deserialize)]
pub struct Rng {
    pub seed: u64,
    pub utility_error_std_dev: f64,
    pub fixed_initial_soc: Option<f64>,
}

#[derive(Deserialize)]
pub struct Files {
    pub activities_csv: String,
    pub schedule_csv: String,
}

#[derive(Deserialize)]
pub struct Config {
    pub general: General,
    pub horizon: Horizon,
    pub travel: Travel,
    /// Per-group utility coefficients, in group-id order (0 = home first).
    pub groups: Vec<GroupCoefficients>,
    pub charging: Charging,
    pub battery: Battery,
    pub rng: Rng,
    pub files: Files,
}

impl Config {
    /// Builds the DP engine's [`Parameters`] block from the loaded config.
    pub fn to_parameters(&self) -> Parameters {
        let speed_m_per_interval = self.travel.speed_kmh * 1000.0 / 60.0 * self.horizon.interval_minutes;

        Parameters {
            horizon: self.horizon.intervals,
            interval_minutes: self.horizon.interval_minutes,
            speed_m_per_interval,
            travel_time_penalty: self.travel.travel_time_penalty,
            group_utility: self
                .groups
                .iter()
                .map(|g| GroupUtility { asc: g.asc, early: g.early, late: g.late, short: g.short, long: g.long })
                .collect(),
            charger_speeds: [
                ChargerSpeed { power_kw: self.charging.slow_kw, tariff_per_kwh: self.charging.slow_tariff_per_kwh },
                ChargerSpeed { power_kw: self.charging.fast_kw, tariff_per_kwh: self.charging.fast_tariff_per_kwh },
                ChargerSpeed { power_kw: self.charging.rapid_kw, tariff_per_kwh: self.charging.rapid_tariff_per_kwh },
            ],
            battery_capacity_kwh: self.battery.capacity_kwh,
            energy_consumption_kwh_per_km: self.battery.consumption_kwh_per_km,
            utility_error_std_dev: self.rng.utility_error_std_dev,
            fixed_initial_soc: self.rng.fixed_initial_soc,
            rng_seed: self.rng.seed,
        }
    }
}

/// Loads the configuration file and returns a struct with all configuration
/// items.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;
    Ok(config)
}
