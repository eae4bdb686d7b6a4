//! Cadence of the background cookie rain.
//!
//! The more the player produces, the more often a cookie falls behind the
//! scene. The rate grows logarithmically with cps and is capped so a large
//! economy cannot flood the effect layer.

use glam::DVec2;
use rand::Rng;

use crate::config::{MIN_SPAWN_INTERVAL, SPAWN_AREA_MIN, SPAWN_AREA_SIZE};
use crate::time::FixedStep;

/// Seconds between background spawns at `cps`, or `None` when nothing is produced.
pub fn spawn_interval(cps: u64) -> Option<f64> {
    if cps == 0 {
        return None;
    }
    Some((1.0 / (cps as f64 * 2.0).log2()).max(MIN_SPAWN_INTERVAL))
}

/// Uniform point in the band above the screen where background cookies start.
pub fn random_spawn_point(rng: &mut impl Rng) -> DVec2 {
    SPAWN_AREA_MIN
        + DVec2::new(
            rng.gen_range(0.0..=SPAWN_AREA_SIZE.x),
            rng.gen_range(0.0..=SPAWN_AREA_SIZE.y),
        )
}

#[derive(Clone, Debug, Default)]
pub struct SpawnRateController {
    clock: FixedStep,
}

impl SpawnRateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds and return how many cookies should spawn.
    ///
    /// Time only accumulates while something is being produced.
    pub fn tick(&mut self, cps: u64, delta: f64) -> u64 {
        match spawn_interval(cps) {
            Some(interval) => self.clock.drain(delta, interval),
            None => 0,
        }
    }

    /// Time carried over towards the next spawn.
    pub fn pending(&self) -> f64 {
        self.clock.remainder()
    }
}
