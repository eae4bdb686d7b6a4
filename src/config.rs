//! Tunables and the item catalog.
//!
//! Every number the simulation depends on lives here so the formulas in
//! `economy`, `spring`, `effects` and `spawn` read as plain math.

use glam::DVec2;

use crate::economy::Item;
use crate::input::Region;

// ── Economy ─────────────────────────────────────────────────────
/// Production is credited in discrete steps of this many seconds.
pub const PRODUCTION_QUANTUM: f64 = 0.1;

// ── Spring (cookie squash) ──────────────────────────────────────
pub const SPRING_STEP: f64 = 0.005;
pub const SPRING_STIFFNESS: f64 = 0.02;
pub const SPRING_PRESS_FORCE: f64 = 0.004;
pub const SPRING_DAMPING: f64 = 0.92;
/// Cookie sprite scale when the spring is at rest.
pub const COOKIE_BASE_SCALE: f64 = 1.5;

// ── Effects ─────────────────────────────────────────────────────
/// Downward acceleration shared by falling effects (world units / s²).
pub const GRAVITY: DVec2 = DVec2::new(0.0, 120.0);
pub const BACKGROUND_FALL_SECS: f64 = 3.0;
pub const COOKIE_BURST_SECS: f64 = 1.0;
pub const PLUS_ONE_SECS: f64 = 1.0;
pub const BURST_SPEED: f64 = 80.0;
/// Half-angle of the burst cone around straight up, in degrees.
pub const BURST_SPREAD_DEG: f64 = 40.0;
pub const BURST_SCALE_MIN: f64 = 0.5;
pub const BURST_SCALE_MAX: f64 = 0.7;
pub const PLUS_ONE_RISE_SPEED: f64 = 120.0;
pub const BACKGROUND_SPRITE_SCALE: f64 = 0.3;

// ── Background spawning ─────────────────────────────────────────
/// Lower bound on the interval between background cookies.
pub const MIN_SPAWN_INTERVAL: f64 = 0.03;

// ── Scene layout (world units, y grows downward) ────────────────
pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;
pub const COOKIE_CENTER: DVec2 = DVec2::new(170.0, 300.0);
pub const COOKIE_RADIUS: f64 = 100.0;
pub const HALO_RADIUS: f64 = 180.0;
pub const COUNTER_POS: DVec2 = DVec2::new(170.0, 100.0);
pub const CPS_LABEL_POS: DVec2 = DVec2::new(170.0, 160.0);
/// Background cookies appear somewhere in this band above the screen.
pub const SPAWN_AREA_MIN: DVec2 = DVec2::new(0.0, -150.0);
pub const SPAWN_AREA_SIZE: DVec2 = DVec2::new(800.0, 100.0);
pub const BUTTON_ORIGIN: DVec2 = DVec2::new(340.0, 40.0);
pub const BUTTON_SIZE: DVec2 = DVec2::new(420.0, 100.0);
pub const BUTTON_PITCH: f64 = 120.0;

// ── Persistence ─────────────────────────────────────────────────
/// File name (native) or localStorage key (browser) of the save record.
pub const SAVE_KEY: &str = "game.save";

/// Frame deltas longer than this are clamped (tab switches, debugger pauses).
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// The clickable cookie.
pub fn cookie_region() -> Region {
    Region::Circle {
        center: COOKIE_CENTER,
        radius: COOKIE_RADIUS,
    }
}

/// Purchase button of the `index`-th catalog entry.
pub fn button_region(index: usize) -> Region {
    Region::Rect {
        min: BUTTON_ORIGIN + DVec2::new(0.0, BUTTON_PITCH * index as f64),
        size: BUTTON_SIZE,
    }
}

/// Farm, factory and harbor.
pub fn default_catalog() -> Vec<Item> {
    vec![
        Item::new("🌾", "クッキー農場", 10, 1),
        Item::new("🏭", "クッキー工場", 100, 10),
        Item::new("⚓", "クッキー港", 1_000, 100),
    ]
}

/// Runtime configuration of one game session.
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub catalog: Vec<Item>,
    pub save_key: String,
    pub max_frame_delta: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            save_key: SAVE_KEY.to_string(),
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }
}
