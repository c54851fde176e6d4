//! The parameter block: scalar constants and per-group utility coefficients
//! shared read-only across one solve.

use crate::errors::InputError;

/// Per-group piecewise-linear utility coefficients, indexed by group id.
#[derive(Debug, Clone)]
pub struct GroupUtility {
    pub asc: f64,
    pub early: f64,
    pub late: f64,
    pub short: f64,
    pub long: f64,
}

/// Charger physical/tariff constants, one entry per speed (slow/fast/rapid).
#[derive(Debug, Clone, Copy)]
pub struct ChargerSpeed {
    pub power_kw: f64,
    pub tariff_per_kwh: f64,
}

/// All scalar and per-group knobs a solve needs. Installed once by the
/// caller and treated as read-only for the duration of a solve.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Number of discrete time intervals covering the horizon (e.g. 288 at
    /// 5-minute steps over 24 hours).
    pub horizon: u32,
    /// Length of one discrete interval, in minutes.
    pub interval_minutes: f64,
    /// Average travel speed, meters per interval.
    pub speed_m_per_interval: f64,
    /// Additive utility penalty per interval of travel time (normally
    /// negative).
    pub travel_time_penalty: f64,
    /// Per-group utility coefficients, indexed by group id (0 = home, never
    /// consulted since home never incurs timing/duration deviation terms
    /// beyond its own `asc`).
    pub group_utility: Vec<GroupUtility>,
    /// Charger constants for the three physical speeds (index 0 = slow,
    /// 1 = fast, 2 = rapid). Free modes reuse these for power but are
    /// charged a zero tariff by the extension operator.
    pub charger_speeds: [ChargerSpeed; 3],
    /// Usable battery capacity, kWh.
    pub battery_capacity_kwh: f64,
    /// Energy consumption per kilometre travelled, kWh/km.
    pub energy_consumption_kwh_per_km: f64,
    /// Standard deviation of the reproducible utility-error perturbation;
    /// 0 disables it entirely.
    pub utility_error_std_dev: f64,
    /// Fixed initial state of charge, if the caller wants a deterministic
    /// start rather than a random draw.
    pub fixed_initial_soc: Option<f64>,
    /// Seed for both the initial-SOC draw and the utility-error terms.
    pub rng_seed: u64,
}

impl Parameters {
    /// Converts a utility coefficient currency weight into canonical units;
    /// charge cost already being in currency units, this is the identity in
    /// the default configuration but stays a named conversion point so a
    /// caller pricing utility on a different scale has somewhere to hook in.
    pub fn charge_cost_utility_weight(&self) -> f64 {
        1.0
    }

    pub fn group(&self, group: u8) -> Option<&GroupUtility> {
        self.group_utility.get(group as usize)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.horizon == 0 {
            return Err(InputError::BadParameter("horizon must be > 0".into()));
        }
        if self.interval_minutes <= 0.0 {
            return Err(InputError::BadParameter("interval_minutes must be > 0".into()));
        }
        if self.speed_m_per_interval <= 0.0 {
            return Err(InputError::BadParameter("speed_m_per_interval must be > 0".into()));
        }
        if self.battery_capacity_kwh <= 0.0 {
            return Err(InputError::BadParameter("battery_capacity_kwh must be > 0".into()));
        }
        if self.utility_error_std_dev < 0.0 {
            return Err(InputError::BadParameter("utility_error_std_dev must be >= 0".into()));
        }
        if let Some(soc) = self.fixed_initial_soc {
            if !(0.0..=1.0).contains(&soc) {
                return Err(InputError::BadParameter("fixed_initial_soc must be in [0,1]".into()));
            }
        }
        Ok(())
    }
}
