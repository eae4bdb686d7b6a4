//! The game loop: one owned aggregate advanced once per rendered frame.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::actions::Action;
use crate::config::{button_region, cookie_region, GameConfig};
use crate::draw::{draw_scene, Surface};
use crate::economy::{self, EconomyState, Item};
use crate::effects::{EffectInstance, EffectScheduler};
use crate::input::{InputSource, Region};
use crate::save::{Persistence, SaveRecord, SaveStore};
use crate::spawn::{random_spawn_point, SpawnRateController};
use crate::spring::Spring;
use crate::time::FrameClock;

/// Everything that changes while playing.
pub struct Game {
    config: GameConfig,
    pub economy: EconomyState,
    pub spring: Spring,
    pub effects: EffectScheduler,
    pub spawner: SpawnRateController,
    rng: StdRng,
}

impl Game {
    /// Start a session, resuming `saved` when it fits this catalog.
    pub fn new(config: GameConfig, saved: Option<SaveRecord>, seed: u64) -> Self {
        let kinds = config.catalog.len();
        let economy = match saved.as_ref().map(|r| EconomyState::from_record(r, kinds)) {
            Some(Some(economy)) => economy,
            Some(None) => {
                warn!("save record is out of range, starting fresh");
                EconomyState::new(kinds)
            }
            None => EconomyState::new(kinds),
        };
        Self {
            config,
            economy,
            spring: Spring::new(),
            effects: EffectScheduler::new(),
            spawner: SpawnRateController::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start a session from whatever `persistence` holds.
    pub fn load<S: SaveStore>(config: GameConfig, persistence: &Persistence<S>, seed: u64) -> Self {
        let saved = persistence.load();
        Self::new(config, saved, seed)
    }

    pub fn catalog(&self) -> &[Item] {
        &self.config.catalog
    }

    pub fn cookie_region(&self) -> Region {
        cookie_region()
    }

    pub fn cps(&self) -> u64 {
        economy::compute_cps(&self.config.catalog, &self.economy.item_counts)
    }

    /// Advance one frame.
    ///
    /// Order matters: production lands before clicks and clicks before
    /// purchases, so every step sees the cookies earned by the ones before it.
    pub fn update(&mut self, input: &impl InputSource, clock: &impl FrameClock) {
        let delta = clock.delta_time();
        let cps = self.cps();

        economy::accrue(&mut self.economy, cps, delta);

        let spawns = self.spawner.tick(cps, delta);
        for _ in 0..spawns {
            self.spawn_background_cookie();
        }

        let region = cookie_region();
        self.spring.update(delta, input.pressed(&region));

        if let Some(at) = input.click_point().filter(|&p| region.contains(p)) {
            self.click_cookie(at);
        }
        for action in input.actions() {
            if *action == Action::ClickCookie {
                self.click_cookie(region_center(&region));
            }
        }

        // Effects spawned above already age by this frame's delta.
        self.effects.advance(delta);

        self.process_purchases(input);
    }

    /// One click: a cookie, a burst, a "+1" and one more cookie in the background.
    pub fn click_cookie(&mut self, at: DVec2) {
        self.economy.click();

        let jitter = DVec2::new(
            self.rng.gen_range(-5..=5) as f64,
            self.rng.gen_range(-5..=5) as f64,
        );
        let burst = EffectInstance::cookie_burst(at + jitter, &mut self.rng);
        self.effects.foreground.add(burst);

        let jitter = DVec2::new(
            self.rng.gen_range(-5..=5) as f64,
            self.rng.gen_range(-15..=-5) as f64,
        );
        self.effects.foreground.add(EffectInstance::plus_one(at + jitter));

        self.spawn_background_cookie();
    }

    fn spawn_background_cookie(&mut self) {
        let start = random_spawn_point(&mut self.rng);
        let fall = EffectInstance::background_fall(start, &mut self.rng);
        self.effects.background.add(fall);
    }

    /// Each button buys at most once per frame, in catalog order.
    fn process_purchases(&mut self, input: &impl InputSource) {
        let mut bought = vec![false; self.config.catalog.len()];

        for (index, done) in bought.iter_mut().enumerate() {
            if input.clicked(&button_region(index)) {
                *done = self.try_purchase(index);
            }
        }
        for action in input.actions() {
            if let Action::Buy(index) = *action {
                match bought.get(index) {
                    Some(false) => bought[index] = self.try_purchase(index),
                    Some(true) => {}
                    None => debug!(index, "no item bound to key"),
                }
            }
        }
    }

    fn try_purchase(&mut self, index: usize) -> bool {
        match economy::purchase(&mut self.economy, &self.config.catalog, index) {
            Ok(_) => true,
            Err(e) => {
                debug!(index, reason = %e, "purchase refused");
                false
            }
        }
    }

    /// Emit this frame's primitives.
    pub fn draw(&self, surface: &mut impl Surface, input: &impl InputSource, scene_time: f64) {
        draw_scene(self, input, scene_time, surface);
    }

    pub fn save_record(&self) -> SaveRecord {
        self.economy.to_record()
    }

    /// Persist once. Failures are logged, not retried.
    pub fn shutdown<S: SaveStore>(&self, persistence: &Persistence<S>) {
        match persistence.save(&self.save_record()) {
            Ok(()) => info!("progress saved on exit"),
            Err(e) => warn!(error = %e, "could not save progress"),
        }
    }
}

fn region_center(region: &Region) -> DVec2 {
    match *region {
        Region::Circle { center, .. } => center,
        Region::Rect { min, size } => min + size * 0.5,
    }
}
