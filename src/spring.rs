//! Damped spring behind the cookie's squash-and-stretch.

use crate::config::{
    COOKIE_BASE_SCALE, SPRING_DAMPING, SPRING_PRESS_FORCE, SPRING_STEP, SPRING_STIFFNESS,
};
use crate::time::FixedStep;

/// Semi-implicit integrator run at a fixed 5 ms step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spring {
    /// Displacement from rest. Positive while the cookie is squashed.
    x: f64,
    velocity: f64,
    clock: FixedStep,
}

impl Spring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds. `pressed` holds for every sub-step of this call.
    pub fn update(&mut self, delta: f64, pressed: bool) {
        let steps = self.clock.drain(delta, SPRING_STEP);
        for _ in 0..steps {
            self.step(pressed);
        }
    }

    fn step(&mut self, pressed: bool) {
        let mut force = -SPRING_STIFFNESS * self.x;
        if pressed {
            force += SPRING_PRESS_FORCE;
        }
        self.velocity = (self.velocity + force) * SPRING_DAMPING;
        self.x += self.velocity;
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Leftover time not yet simulated.
    pub fn accumulated_time(&self) -> f64 {
        self.clock.remainder()
    }

    /// Sprite scale for the cookie: shrinks while squashed.
    pub fn scale(&self) -> f64 {
        COOKIE_BASE_SCALE - self.x
    }
}
