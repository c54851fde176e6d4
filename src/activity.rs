//! The activity table: the immutable per-solve input to the DP engine.

use crate::errors::InputError;

/// Charger speed/tariff variant. Modes 4-6 are the "free" counterparts of
/// 1-3: same charge power, tariff pinned to zero in the extension operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeMode {
    None,
    Slow,
    Fast,
    Rapid,
    SlowFree,
    FastFree,
    RapidFree,
}

impl ChargeMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => ChargeMode::None,
            1 => ChargeMode::Slow,
            2 => ChargeMode::Fast,
            3 => ChargeMode::Rapid,
            4 => ChargeMode::SlowFree,
            5 => ChargeMode::FastFree,
            6 => ChargeMode::RapidFree,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ChargeMode::None => 0,
            ChargeMode::Slow => 1,
            ChargeMode::Fast => 2,
            ChargeMode::Rapid => 3,
            ChargeMode::SlowFree => 4,
            ChargeMode::FastFree => 5,
            ChargeMode::RapidFree => 6,
        }
    }

    pub fn is_free(self) -> bool {
        matches!(self, ChargeMode::SlowFree | ChargeMode::FastFree | ChargeMode::RapidFree)
    }

    /// Index 0..=2 into the power/tariff tables, collapsing the free variants
    /// onto their paid counterparts.
    pub fn speed_index(self) -> Option<usize> {
        match self {
            ChargeMode::None => None,
            ChargeMode::Slow | ChargeMode::SlowFree => Some(0),
            ChargeMode::Fast | ChargeMode::FastFree => Some(1),
            ChargeMode::Rapid | ChargeMode::RapidFree => Some(2),
        }
    }
}

/// One row of the activity table. `id` is the index into the table the
/// activity was installed at; dawn is `id == 0`, dusk is `id == N - 1`.
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: usize,
    pub act_type: String,
    pub x: f64,
    pub y: f64,
    pub group: u8,
    pub earliest_start: u32,
    pub latest_start: u32,
    pub min_duration: u32,
    pub max_duration: u32,
    pub des_start: u32,
    pub des_duration: u32,
    pub charge_mode: ChargeMode,
    pub is_charging: bool,
    pub is_service_station: bool,
}

impl Activity {
    pub fn is_home(&self) -> bool {
        self.group == 0
    }
}

/// Validates a freshly loaded activity table against the data-model
/// invariants of the input layout: dawn/dusk placement, time-window
/// sanity, group range, and the charging-flag coupling. `n_groups` is the
/// number of group ids the parameter block has coefficients for (i.e.
/// `Parameters::group_utility.len()`); any activity referencing a group
/// outside `0..n_groups` is rejected here rather than silently dropped
/// during extension.
pub fn validate_activities(activities: &[Activity], horizon: u32, n_groups: usize) -> Result<(), InputError> {
    if activities.len() < 2 {
        return Err(InputError::MissingAnchor(
            "activity table must contain at least dawn and dusk".into(),
        ));
    }

    let dawn = &activities[0];
    if !dawn.is_home() || dawn.earliest_start != 0 || dawn.latest_start != 0 {
        return Err(InputError::MissingAnchor(
            "activity 0 must be home with earliest_start = latest_start = 0".into(),
        ));
    }

    let dusk = activities.last().unwrap();
    if !dusk.is_home() || dusk.latest_start != horizon {
        return Err(InputError::MissingAnchor(format!(
            "last activity must be home with latest_start = horizon ({horizon})"
        )));
    }

    for (i, a) in activities.iter().enumerate() {
        if a.id != i {
            return Err(InputError::BadRow(i, "id does not match table position".into()));
        }
        if a.earliest_start > a.latest_start {
            return Err(InputError::BadRow(i, "earliest_start > latest_start".into()));
        }
        if a.min_duration > a.max_duration {
            return Err(InputError::BadRow(i, "min_duration > max_duration".into()));
        }
        if a.latest_start > horizon {
            return Err(InputError::BadRow(i, "latest_start beyond horizon".into()));
        }
        if a.group as usize >= n_groups {
            return Err(InputError::BadRow(i, format!("group {} out of range (0..{n_groups})", a.group)));
        }
        if a.is_service_station && !a.is_charging {
            return Err(InputError::BadRow(i, "service station must have is_charging set".into()));
        }
        if a.is_charging && a.charge_mode == ChargeMode::None {
            return Err(InputError::BadRow(i, "is_charging set but charge_mode is none".into()));
        }
        if !a.is_charging && a.charge_mode != ChargeMode::None {
            return Err(InputError::BadRow(
                i,
                "charge_mode set on an activity that does not charge".into(),
            ));
        }
    }

    Ok(())
}
