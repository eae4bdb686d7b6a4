//! Frame timing and the fixed-step accumulator.
//!
//! `draw_web()` calls at ~60fps with variable delta. `FrameTimer` turns
//! wall-clock timestamps into per-frame deltas in seconds, and `FixedStep`
//! converts those deltas into whole fixed-length steps so production,
//! spawning and the spring behave the same at any frame rate.

/// Read-only view of frame timing for the game loop.
pub trait FrameClock {
    /// Seconds elapsed since the previous frame.
    fn delta_time(&self) -> f64;
    /// Seconds elapsed since the scene started.
    fn scene_time(&self) -> f64;
}

/// Accumulates elapsed time and hands it out in whole periods.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedStep {
    /// Seconds accumulated but not yet consumed as steps.
    accumulator: f64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leftover time, always in `[0, period)` after a `drain`.
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    /// Add `delta` seconds and return how many whole `period`s fit.
    ///
    /// The consumed periods are subtracted; the rest carries over to the
    /// next call. A long `delta` (e.g. after a stall) yields many steps at
    /// once. Non-positive or non-finite periods never fire.
    pub fn drain(&mut self, delta: f64, period: f64) -> u64 {
        if delta.is_finite() && delta > 0.0 {
            self.accumulator += delta;
        }
        if !(period.is_finite() && period > 0.0) {
            return 0;
        }
        let steps = (self.accumulator / period).floor();
        // Floating point can leave `steps * period` a hair above the total.
        self.accumulator = (self.accumulator - steps * period).max(0.0);
        if self.accumulator >= period {
            self.accumulator -= period;
            return steps as u64 + 1;
        }
        steps as u64
    }
}

/// Frame clock fed with wall-clock timestamps once per rendered frame.
pub struct FrameTimer {
    /// Longest delta reported for a single frame, in seconds.
    max_delta: f64,
    delta: f64,
    elapsed: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl FrameTimer {
    pub fn new(max_delta: f64) -> Self {
        Self {
            max_delta,
            delta: 0.0,
            elapsed: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the clamped delta in seconds for this frame.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta = match self.last_timestamp {
            Some(prev) => {
                let d = (now_ms - prev) / 1000.0;
                // Clamp to avoid spiral-of-death if tab was backgrounded
                d.clamp(0.0, self.max_delta)
            }
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);
        self.delta = delta;
        self.elapsed += delta;
        delta
    }
}

impl FrameClock for FrameTimer {
    fn delta_time(&self) -> f64 {
        self.delta
    }

    fn scene_time(&self) -> f64 {
        self.elapsed
    }
}

/// A clock that reports whatever it is told. Handy for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedClock {
    pub delta: f64,
    pub elapsed: f64,
}

impl FixedClock {
    pub fn new(delta: f64) -> Self {
        Self { delta, elapsed: 0.0 }
    }

    /// Move to the next frame.
    pub fn advance(&mut self) {
        self.elapsed += self.delta;
    }
}

impl FrameClock for FixedClock {
    fn delta_time(&self) -> f64 {
        self.delta
    }

    fn scene_time(&self) -> f64 {
        self.elapsed
    }
}
