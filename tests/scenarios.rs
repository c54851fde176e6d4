//! End-to-end scenarios driving the public solve API directly, without any
//! CSV or config plumbing.

use ev_schedule_dp::activity::{Activity, ChargeMode};
use ev_schedule_dp::params::{ChargerSpeed, GroupUtility, Parameters};
use ev_schedule_dp::solve_schedule;

const HORIZON: u32 = 288;

fn home(id: usize, earliest: u32, latest: u32, min_d: u32, max_d: u32) -> Activity {
    Activity {
        id,
        act_type: "home".into(),
        x: 0.0,
        y: 0.0,
        group: 0,
        earliest_start: earliest,
        latest_start: latest,
        min_duration: min_d,
        max_duration: max_d,
        des_start: earliest,
        des_duration: min_d,
        charge_mode: ChargeMode::None,
        is_charging: false,
        is_service_station: false,
    }
}

fn activity(
    id: usize,
    act_type: &str,
    x: f64,
    y: f64,
    group: u8,
    earliest: u32,
    latest: u32,
    min_d: u32,
    max_d: u32,
    des_start: u32,
    des_duration: u32,
) -> Activity {
    Activity {
        id,
        act_type: act_type.into(),
        x,
        y,
        group,
        earliest_start: earliest,
        latest_start: latest,
        min_duration: min_d,
        max_duration: max_d,
        des_start,
        des_duration,
        charge_mode: ChargeMode::None,
        is_charging: false,
        is_service_station: false,
    }
}

fn base_params(n_groups: usize) -> Parameters {
    Parameters {
        horizon: HORIZON,
        interval_minutes: 5.0,
        speed_m_per_interval: 500.0, // 6 km/h-equivalent per 5-minute step, generous for short hops
        travel_time_penalty: -0.02,
        // Group 0 is always "home" in these scenarios. Dawn/dusk timing is
        // largely dictated by feasibility rather than preference, so giving
        // it zero deviation coefficients keeps the home legs from swinging
        // utility around for reasons unrelated to what's under test.
        group_utility: (0..n_groups)
            .map(|g| {
                if g == 0 {
                    GroupUtility { asc: 5.0, early: 0.0, late: 0.0, short: 0.0, long: 0.0 }
                } else {
                    GroupUtility { asc: 5.0, early: -0.05, late: -0.05, short: -0.1, long: -0.02 }
                }
            })
            .collect(),
        charger_speeds: [
            ChargerSpeed { power_kw: 7.0, tariff_per_kwh: 2.0 },
            ChargerSpeed { power_kw: 22.0, tariff_per_kwh: 2.5 },
            ChargerSpeed { power_kw: 50.0, tariff_per_kwh: 3.0 },
        ],
        battery_capacity_kwh: 60.0,
        energy_consumption_kwh_per_km: 0.2,
        utility_error_std_dev: 0.0,
        fixed_initial_soc: Some(0.5),
        rng_seed: 42,
    }
}

#[test]
fn single_home_day() {
    let acts = vec![home(0, 0, 0, 0, 1), home(1, 0, HORIZON, 1, HORIZON)];
    let params = base_params(1);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].soc_end, rows[0].soc_start);
    assert_eq!(rows.last().unwrap().duration_intervals, HORIZON);
}

#[test]
fn home_work_home_without_charging() {
    // 10 km away; 200 m/interval * 5 min => distance in meters
    let work_x = 10_000.0;
    let acts = vec![
        home(0, 0, 0, 0, 1),
        activity(1, "work", work_x, 0.0, 1, 0, 280, 48, 120, 96, 96),
        home(2, 0, HORIZON, 1, HORIZON),
    ];
    let params = base_params(2);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    let work_row = rows.iter().find(|r| r.act_type == "work").expect("work visited");
    assert_eq!(rows.iter().filter(|r| r.act_type == "work").count(), 1);

    // two one-way trips of 10 km at 0.2 kWh/km on a 60 kWh battery
    let expected_drop = 2.0 * (10.0 * 0.2 / 60.0);
    let final_soc = rows.last().unwrap().soc_end;
    assert!((0.5 - final_soc - expected_drop).abs() < 0.02, "final_soc={final_soc}");
    assert!(work_row.soc_start < 0.5);
}

#[test]
fn mandatory_service_station_recharge() {
    let mut station = activity(1, "station", 5_000.0, 0.0, 1, 0, 280, 10, 60, 0, 10);
    station.is_charging = true;
    station.is_service_station = true;
    station.charge_mode = ChargeMode::Rapid;

    let acts = vec![
        home(0, 0, 0, 0, 1),
        station,
        activity(2, "work", 10_000.0, 0.0, 2, 0, 280, 10, 60, 60, 30),
        home(3, 0, HORIZON, 1, HORIZON),
    ];
    let mut params = base_params(3);
    // Low enough that the direct dawn-work-dusk round trip (2 * 10 km) would
    // go negative without detouring via the 5 km-out rapid station first.
    params.fixed_initial_soc = Some(0.03);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    let station_row = rows.iter().find(|r| r.act_type == "station").expect("station visited to stay feasible");
    let expected_charge_hours = station_row.duration_intervals as f64 * params.interval_minutes / 60.0;
    assert!((station_row.charge_duration_hours - expected_charge_hours).abs() < 1e-9);
    assert!(station_row.is_charging);
    assert!(rows.iter().all(|r| r.soc_start >= 0.0 && r.soc_end >= 0.0));
}

#[test]
fn free_charging_is_preferred_over_paid() {
    // Same group, same location, same timing/duration window: visiting one
    // forbids visiting the other (non-home groups can't repeat), so the
    // solver must pick exactly one. A too-small initial SOC for the round
    // trip without charging forces it to pick one of them at all.
    let mut paid = activity(1, "charge_paid", 5_000.0, 0.0, 1, 0, 280, 30, 60, 30, 30);
    paid.is_charging = true;
    paid.charge_mode = ChargeMode::Slow;

    let mut free = activity(2, "charge_free", 5_000.0, 0.0, 1, 0, 280, 30, 60, 30, 30);
    free.is_charging = true;
    free.charge_mode = ChargeMode::SlowFree;

    let acts = vec![home(0, 0, 0, 0, 1), paid, free, home(3, 0, HORIZON, 1, HORIZON)];
    let mut params = base_params(2);
    params.fixed_initial_soc = Some(0.02);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    let visited_free = rows.iter().any(|r| r.act_type == "charge_free");
    let visited_paid = rows.iter().any(|r| r.act_type == "charge_paid");
    assert!(visited_free && !visited_paid, "prefers the free charger when both are otherwise identical");
    assert_eq!(rows.last().unwrap().charge_cost, 0.0);
}

#[test]
fn group_repeat_is_forbidden_by_dssr() {
    let acts = vec![
        home(0, 0, 0, 0, 1),
        activity(1, "errand_a", 1_000.0, 0.0, 1, 0, 100, 5, 20, 20, 10),
        activity(2, "errand_b", 1_200.0, 0.0, 1, 0, 200, 5, 20, 120, 10),
        activity(3, "errand_c", 1_400.0, 0.0, 1, 0, 280, 5, 20, 220, 10),
        home(4, 0, HORIZON, 1, HORIZON),
    ];
    let params = base_params(2);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    let group1_visits = rows.iter().filter(|r| r.act_type.starts_with("errand")).count();
    assert!(group1_visits <= 1, "non-home group must appear at most once, got {group1_visits}");
}

#[test]
fn reproducible_under_utility_error_terms() {
    let acts = vec![
        home(0, 0, 0, 0, 1),
        activity(1, "work", 8_000.0, 0.0, 1, 0, 280, 48, 120, 96, 96),
        home(2, 0, HORIZON, 1, HORIZON),
    ];
    let mut params = base_params(2);
    params.utility_error_std_dev = 1.0;
    params.rng_seed = 42;
    params.fixed_initial_soc = Some(0.5);

    let first = solve_schedule(&params, &acts).unwrap().unwrap();
    let second = solve_schedule(&params, &acts).unwrap().unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.act_id, b.act_id);
        assert_eq!(a.start_time_hours, b.start_time_hours);
        assert_eq!(a.duration_intervals, b.duration_intervals);
        assert_eq!(a.soc_end, b.soc_end);
        assert_eq!(a.utility, b.utility);
    }
}

#[test]
fn utility_is_monotonically_non_decreasing_along_the_chain() {
    let acts = vec![
        home(0, 0, 0, 0, 1),
        activity(1, "work", 8_000.0, 0.0, 1, 0, 280, 48, 120, 96, 96),
        home(2, 0, HORIZON, 1, HORIZON),
    ];
    let params = base_params(2);
    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    for pair in rows.windows(2) {
        assert!(pair[1].utility >= pair[0].utility);
    }
}

#[test]
fn high_initial_soc_with_service_station_never_overflows_full_battery() {
    let mut station = activity(1, "station", 2_000.0, 0.0, 1, 0, 280, 10, 60, 0, 10);
    station.is_charging = true;
    station.is_service_station = true;
    station.charge_mode = ChargeMode::Rapid;

    let acts = vec![home(0, 0, 0, 0, 1), station, home(2, 0, HORIZON, 1, HORIZON)];
    let mut params = base_params(2);
    params.fixed_initial_soc = Some(0.95);

    let rows = solve_schedule(&params, &acts).unwrap().unwrap();

    assert!(rows.iter().all(|r| r.soc_end <= 1.0 + 1e-9 && r.soc_start <= 1.0 + 1e-9));
}

#[test]
fn low_initial_soc_without_chargers_stays_feasible_or_reports_infeasible() {
    let acts = vec![
        home(0, 0, 0, 0, 1),
        activity(1, "work", 30_000.0, 0.0, 1, 0, 280, 48, 120, 96, 96),
        home(2, 0, HORIZON, 1, HORIZON),
    ];
    let mut params = base_params(2);
    params.fixed_initial_soc = Some(0.1);

    match solve_schedule(&params, &acts).unwrap() {
        Ok(rows) => assert!(rows.iter().all(|r| r.soc_start >= 0.0 && r.soc_end >= 0.0)),
        Err(_) => {} // infeasible is an acceptable outcome for a battery this constrained
    }
}
