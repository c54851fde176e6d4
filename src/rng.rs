//! Seeded randomness: the one-shot initial-SOC draw and the reproducible
//! per-extension utility-error perturbation.
//!
//! The design notes are explicit that the error term must be a pure
//! function of `(seed, a, b, start_b, duration_b)` rather than a draw from a
//! running generator, so that dominance comparisons stay consistent no
//! matter what order the extension operator visits successors in. The
//! initial-SOC draw, by contrast, happens exactly once per solve and may use
//! an ordinary seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws the seed label's initial SOC from a uniform distribution over
/// `[0.2, 1.0]` when the caller has not pinned a fixed value. The range
/// avoids seeding solves with an already-critical battery level.
pub fn draw_initial_soc(seed: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    rng.gen_range(0.2..=1.0)
}

/// SplitMix64 mixing step, used to turn `(seed, a, b, start_b, duration_b)`
/// into a well-distributed 64-bit value without needing a stateful
/// generator.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mix_key(seed: u64, a: usize, b: usize, start_b: u32, duration_b: u32) -> u64 {
    let mut h = splitmix64(seed);
    h = splitmix64(h ^ a as u64);
    h = splitmix64(h ^ b as u64);
    h = splitmix64(h ^ ((start_b as u64) << 32 | duration_b as u64));
    h
}

/// Deterministic-per-seed utility perturbation for extending from activity
/// `a` to activity `b` with the given timing choice. Returns 0 whenever
/// `std_dev` is 0, per the parameter block's contract that a zero standard
/// deviation disables the error term entirely.
pub fn utility_error(seed: u64, a: usize, b: usize, start_b: u32, duration_b: u32, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let h = mix_key(seed, a, b, start_b, duration_b);
    let u1 = ((h & 0xFFFF_FFFF) as f64 + 1.0) / (u32::MAX as f64 + 2.0);
    let u2 = (((h >> 32) & 0xFFFF_FFFF) as f64 + 1.0) / (u32::MAX as f64 + 2.0);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z * std_dev
}
