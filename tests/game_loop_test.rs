//! Integration test: frame-by-frame game loop
//!
//! Drives `Game` through its public API the way the browser front-end does:
//! feed input, advance one frame, draw, end the frame.

use cookie_clicker::config::{cookie_region, COOKIE_CENTER};
use cookie_clicker::draw::DrawList;
use cookie_clicker::economy::{self, EconomyState, Item, PurchaseError};
use cookie_clicker::input::{InputEvent, InputSource, PointerState};
use cookie_clicker::save::{FileStore, MemoryStore};
use cookie_clicker::spawn::{spawn_interval, SpawnRateController};
use cookie_clicker::time::{FixedClock, FrameClock, FrameTimer};
use cookie_clicker::{Game, GameConfig, Persistence, SaveRecord};
use glam::DVec2;

/// Run `frames` frames of `delta` seconds with the given pointer.
fn run_frames(game: &mut Game, pointer: &mut PointerState, delta: f64, frames: u32) {
    let mut clock = FixedClock::new(delta);
    for _ in 0..frames {
        game.update(&*pointer, &clock);
        let mut list = DrawList::new();
        game.draw(&mut list, &*pointer, clock.scene_time());
        pointer.end_frame();
        clock.advance();
    }
}

fn tap(pointer: &mut PointerState, pos: DVec2) {
    pointer.handle(&InputEvent::Down(pos));
    pointer.handle(&InputEvent::Up(pos));
}

// =============================================================================
// Economy scenarios
// =============================================================================

#[test]
fn purchase_scenario_from_fifteen_cookies() {
    let catalog = vec![Item::new("🌾", "farm", 10, 1)];
    let mut state = EconomyState::new(1);
    state.cookies = 15.0;

    assert!(economy::purchase(&mut state, &catalog, 0).is_ok());
    assert_eq!(state.cookies, 5.0);
    assert_eq!(state.item_counts, vec![1]);

    let err = economy::purchase(&mut state, &catalog, 0).unwrap_err();
    assert!(matches!(err, PurchaseError::InsufficientFunds { cost: 20, .. }));
    assert_eq!(state.cookies, 5.0);
    assert_eq!(state.item_counts, vec![1]);
}

#[test]
fn spawn_scenario_four_cps() {
    let interval = spawn_interval(4).unwrap();
    assert!((interval - 0.333).abs() < 0.001);

    let mut spawner = SpawnRateController::new();
    assert_eq!(spawner.tick(4, 1.0), 3);
    assert!(spawner.pending().abs() < 1e-9);
}

// =============================================================================
// Full loop
// =============================================================================

#[test]
fn clicking_then_buying_then_idling() {
    let mut game = Game::new(GameConfig::default(), None, 9);
    let mut pointer = PointerState::new();

    // Ten taps on the cookie, one per frame
    for _ in 0..10 {
        tap(&mut pointer, COOKIE_CENTER);
        run_frames(&mut game, &mut pointer, 1.0 / 60.0, 1);
    }
    assert_eq!(game.economy.cookies, 10.0);

    // Buy the first item with its button
    tap(&mut pointer, DVec2::new(500.0, 90.0));
    run_frames(&mut game, &mut pointer, 1.0 / 60.0, 1);
    assert_eq!(game.economy.item_counts, vec![1, 0, 0]);
    assert_eq!(game.cps(), 1);

    // Ten idle seconds at 1 cps
    run_frames(&mut game, &mut pointer, 0.05, 200);
    assert!((game.economy.cookies - 10.0).abs() < 0.2, "{}", game.economy.cookies);
}

#[test]
fn effects_expire_after_idle_time() {
    let mut game = Game::new(GameConfig::default(), None, 2);
    let mut pointer = PointerState::new();
    tap(&mut pointer, COOKIE_CENTER);
    run_frames(&mut game, &mut pointer, 1.0 / 60.0, 1);
    assert_eq!(game.effects.foreground.len(), 2);
    assert_eq!(game.effects.background.len(), 1);

    run_frames(&mut game, &mut pointer, 0.05, 20);
    assert!(game.effects.foreground.is_empty());
    assert_eq!(game.effects.background.len(), 1);

    run_frames(&mut game, &mut pointer, 0.05, 40);
    assert!(game.effects.background.is_empty());
}

#[test]
fn no_production_no_rain() {
    let mut game = Game::new(GameConfig::default(), None, 4);
    let mut pointer = PointerState::new();
    run_frames(&mut game, &mut pointer, 0.1, 600);
    assert_eq!(game.effects.len(), 0);
    assert_eq!(game.economy.cookies, 0.0);
}

#[test]
fn press_and_release_animates_cookie() {
    let mut game = Game::new(GameConfig::default(), None, 4);
    let mut pointer = PointerState::new();
    pointer.handle(&InputEvent::Down(COOKIE_CENTER));
    assert!(pointer.pressed(&cookie_region()));
    run_frames(&mut game, &mut pointer, 1.0 / 60.0, 30);
    let squashed = game.spring.scale();
    assert!(squashed < 1.45);

    pointer.handle(&InputEvent::Up(COOKIE_CENTER));
    run_frames(&mut game, &mut pointer, 1.0 / 60.0, 300);
    assert!((game.spring.scale() - 1.5).abs() < 1e-3);
    // Holding counts as a single click
    assert_eq!(game.economy.cookies, 1.0);
}

#[test]
fn frame_timer_drives_the_loop() {
    let mut game = Game::new(GameConfig::default(), None, 4);
    game.economy.item_counts = vec![0, 1, 0];
    let pointer = PointerState::new();
    let mut timer = FrameTimer::new(0.1);
    // 2 s at ~60fps
    for i in 0..=120 {
        timer.update(i as f64 * 1000.0 / 60.0);
        game.update(&pointer, &timer);
    }
    assert!((timer.scene_time() - 2.0).abs() < 1e-6);
    assert!((game.economy.cookies - 20.0).abs() <= 1.0 + 1e-9);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn save_on_shutdown_resume_in_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.save");

    {
        let persistence = Persistence::new(FileStore::new(&path));
        let mut game = Game::load(GameConfig::default(), &persistence, 1);
        game.economy.cookies = 321.75;
        game.economy.item_counts = vec![2, 1, 0];
        game.shutdown(&persistence);
    }

    let persistence = Persistence::new(FileStore::new(&path));
    let game = Game::load(GameConfig::default(), &persistence, 2);
    assert_eq!(game.economy.cookies, 321.75);
    assert_eq!(game.economy.item_counts, vec![2, 1, 0]);
    assert_eq!(game.cps(), 12);
}

#[test]
fn corrupt_save_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.save");
    std::fs::write(&path, b"definitely not a save").unwrap();

    let persistence = Persistence::new(FileStore::new(&path));
    let game = Game::load(GameConfig::default(), &persistence, 3);
    assert_eq!(game.economy.cookies, 0.0);
    assert_eq!(game.economy.item_counts, vec![0, 0, 0]);
}

#[test]
fn shutdown_to_unwritable_path_does_not_panic() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = Persistence::new(FileStore::new(dir.path().join("nope").join("game.save")));
    let game = Game::new(GameConfig::default(), None, 3);
    game.shutdown(&persistence);
    assert_eq!(persistence.load(), None);
}

#[test]
fn older_shorter_save_keeps_new_items_at_zero() {
    let persistence = Persistence::new(MemoryStore::new());
    persistence
        .save(&SaveRecord {
            cookies: 50.0,
            item_counts: vec![3],
        })
        .unwrap();
    let game = Game::load(GameConfig::default(), &persistence, 3);
    assert_eq!(game.economy.item_counts, vec![3, 0, 0]);
}
