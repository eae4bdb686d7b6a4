//! Transient visuals: falling background cookies, click bursts and "+1" text.
//!
//! Each instance owns its start point, its age and the random parameters
//! drawn when it was created. Instances expire on their own once their age
//! reaches the kind's fixed duration.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

use crate::config::{
    BACKGROUND_FALL_SECS, BURST_SCALE_MAX, BURST_SCALE_MIN, BURST_SPEED, BURST_SPREAD_DEG,
    COOKIE_BURST_SECS, GRAVITY, PLUS_ONE_RISE_SPEED, PLUS_ONE_SECS,
};

/// What an effect is, with the parameters sampled at spawn.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    /// Cookie drifting down behind the scene.
    BackgroundFall { angle: f64 },
    /// Cookie thrown up from the click point, then falling.
    CookieBurst { velocity: DVec2, scale: f64, angle: f64 },
    /// "+1" text rising from the click point.
    PlusOneRise,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectInstance {
    pub start: DVec2,
    /// Seconds since spawn.
    pub age: f64,
    pub kind: EffectKind,
}

impl EffectInstance {
    fn new(start: DVec2, kind: EffectKind) -> Self {
        Self {
            start,
            age: 0.0,
            kind,
        }
    }

    pub fn background_fall(start: DVec2, rng: &mut impl Rng) -> Self {
        Self::new(
            start,
            EffectKind::BackgroundFall {
                angle: rng.gen_range(0.0..TAU),
            },
        )
    }

    pub fn cookie_burst(start: DVec2, rng: &mut impl Rng) -> Self {
        let spread = BURST_SPREAD_DEG.to_radians();
        let heading = rng.gen_range(-spread..=spread);
        Self::new(
            start,
            EffectKind::CookieBurst {
                // Heading is measured clockwise from straight up (screen y grows down).
                velocity: DVec2::new(heading.sin(), -heading.cos()) * BURST_SPEED,
                scale: rng.gen_range(BURST_SCALE_MIN..=BURST_SCALE_MAX),
                angle: rng.gen_range(0.0..TAU),
            },
        )
    }

    pub fn plus_one(start: DVec2) -> Self {
        Self::new(start, EffectKind::PlusOneRise)
    }

    /// Lifetime in seconds.
    pub fn duration(&self) -> f64 {
        match self.kind {
            EffectKind::BackgroundFall { .. } => BACKGROUND_FALL_SECS,
            EffectKind::CookieBurst { .. } => COOKIE_BURST_SECS,
            EffectKind::PlusOneRise => PLUS_ONE_SECS,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.duration()
    }

    pub fn position(&self) -> DVec2 {
        let t = self.age;
        match &self.kind {
            EffectKind::BackgroundFall { .. } => self.start + 0.5 * t * t * GRAVITY,
            EffectKind::CookieBurst { velocity, .. } => {
                self.start + *velocity * t + 0.5 * t * t * GRAVITY
            }
            EffectKind::PlusOneRise => self.start + DVec2::new(0.0, -PLUS_ONE_RISE_SPEED * t),
        }
    }

    /// Opacity, fading linearly from 1 at spawn to 0 at expiry.
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age / self.duration()).clamp(0.0, 1.0)
    }
}

/// One draw layer of live effects.
#[derive(Clone, Debug, Default)]
pub struct EffectLayer {
    instances: Vec<EffectInstance>,
}

impl EffectLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, effect: EffectInstance) {
        self.instances.push(effect);
    }

    /// Age every instance by `delta` and drop the expired ones.
    pub fn advance(&mut self, delta: f64) {
        for effect in &mut self.instances {
            effect.age += delta;
        }
        self.instances.retain(EffectInstance::is_alive);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.instances.iter()
    }
}

/// Background and foreground layers, advanced together.
#[derive(Clone, Debug, Default)]
pub struct EffectScheduler {
    /// Drawn behind the cookie.
    pub background: EffectLayer,
    /// Drawn on top of everything.
    pub foreground: EffectLayer,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, delta: f64) {
        self.background.advance(delta);
        self.foreground.advance(delta);
    }

    pub fn len(&self) -> usize {
        self.background.len() + self.foreground.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn background_fall_kinematics() {
        let mut fall = EffectInstance::background_fall(DVec2::new(100.0, -100.0), &mut rng());
        fall.age = 2.0;
        // 0.5 * 4 * 120 = 240
        assert_eq!(fall.position(), DVec2::new(100.0, 140.0));
        assert!((fall.alpha() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn plus_one_rises_without_gravity() {
        let mut plus = EffectInstance::plus_one(DVec2::new(50.0, 300.0));
        plus.age = 0.5;
        assert_eq!(plus.position(), DVec2::new(50.0, 240.0));
        assert_eq!(plus.alpha(), 0.5);
    }

    #[test]
    fn burst_parameters_stay_in_range() {
        let mut rng = rng();
        for _ in 0..500 {
            let burst = EffectInstance::cookie_burst(DVec2::ZERO, &mut rng);
            let EffectKind::CookieBurst { velocity, scale, angle } = burst.kind else {
                panic!("expected a burst");
            };
            assert!((velocity.length() - BURST_SPEED).abs() < 1e-9);
            // Always thrown upward, within 40° of vertical
            assert!(velocity.y < 0.0);
            let from_vertical = velocity.x.atan2(-velocity.y).to_degrees();
            assert!(from_vertical.abs() <= BURST_SPREAD_DEG + 1e-9);
            assert!((BURST_SCALE_MIN..=BURST_SCALE_MAX).contains(&scale));
            assert!((0.0..TAU).contains(&angle));
        }
    }

    #[test]
    fn burst_parameters_fixed_at_creation() {
        let mut burst = EffectInstance::cookie_burst(DVec2::ZERO, &mut rng());
        let kind = burst.kind.clone();
        burst.age = 0.5;
        assert_eq!(burst.kind, kind);
        let EffectKind::CookieBurst { velocity, .. } = kind else {
            panic!("expected a burst");
        };
        let expected = velocity * 0.5 + 0.5 * 0.25 * GRAVITY;
        assert!((burst.position() - expected).length() < 1e-9);
    }

    #[test]
    fn same_seed_same_effects() {
        let a = EffectInstance::cookie_burst(DVec2::ZERO, &mut StdRng::seed_from_u64(3));
        let b = EffectInstance::cookie_burst(DVec2::ZERO, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn layer_expires_at_duration() {
        let mut layer = EffectLayer::new();
        layer.add(EffectInstance::plus_one(DVec2::ZERO));
        layer.advance(0.5);
        assert_eq!(layer.len(), 1);
        layer.advance(0.25);
        assert_eq!(layer.len(), 1);
        layer.advance(0.25);
        assert!(layer.is_empty());
    }

    #[test]
    fn background_outlives_foreground() {
        let mut rng = rng();
        let mut effects = EffectScheduler::new();
        effects
            .background
            .add(EffectInstance::background_fall(DVec2::ZERO, &mut rng));
        effects
            .foreground
            .add(EffectInstance::cookie_burst(DVec2::ZERO, &mut rng));
        effects.foreground.add(EffectInstance::plus_one(DVec2::ZERO));
        assert_eq!(effects.len(), 3);

        effects.advance(1.5);
        assert_eq!(effects.background.len(), 1);
        assert!(effects.foreground.is_empty());

        effects.advance(1.5);
        assert_eq!(effects.len(), 0);
    }

    #[test]
    fn added_after_advance_starts_fresh() {
        let mut layer = EffectLayer::new();
        layer.add(EffectInstance::plus_one(DVec2::ZERO));
        layer.advance(0.75);
        layer.add(EffectInstance::plus_one(DVec2::ONE));
        let ages: Vec<f64> = layer.iter().map(|e| e.age).collect();
        assert_eq!(ages, vec![0.75, 0.0]);
        layer.advance(0.5);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.iter().next().map(|e| e.start), Some(DVec2::ONE));
    }
}
