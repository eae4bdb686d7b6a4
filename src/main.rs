use std::{cell::RefCell, io, rc::Rc};

use cookie_clicker::draw::DrawList;
use cookie_clicker::input::{pixel_to_world, InputEvent, PointerState};
use cookie_clicker::render::SceneCanvas;
use cookie_clicker::save::SaveStore;
use cookie_clicker::time::{FrameClock, FrameTimer};
use cookie_clicker::{logging, Game, GameConfig, Persistence};
use glam::DVec2;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{info, warn, Level};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[cfg(target_arch = "wasm32")]
fn open_store(config: &GameConfig) -> impl SaveStore + 'static {
    cookie_clicker::save::LocalStorageStore::new(&config.save_key)
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store(config: &GameConfig) -> impl SaveStore + 'static {
    cookie_clicker::save::FileStore::new(&config.save_key)
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Query the grid container's bounding rect and convert client pixels to world coordinates.
fn dom_pixel_to_world(mouse_x: u32, mouse_y: u32) -> Option<DVec2> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    pixel_to_world(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn set_hand_cursor(hand: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let cursor = if hand { "pointer" } else { "default" };
    let _ = body.style().set_property("cursor", cursor);
}

/// Run `callback` when the page is being unloaded.
fn on_page_hide(callback: impl FnMut() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::<dyn FnMut()>::new(callback);
    if window
        .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())
        .is_err()
    {
        warn!("could not register pagehide handler; progress will not be saved");
    }
    closure.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init(Level::INFO);

    let config = GameConfig::default();
    let persistence = Rc::new(Persistence::new(open_store(&config)));
    let seed = (js_sys::Math::random() * 2f64.powi(53)) as u64;
    let timer = Rc::new(RefCell::new(FrameTimer::new(config.max_frame_delta)));
    let game = Rc::new(RefCell::new(Game::load(config, &*persistence, seed)));
    let pointer = Rc::new(RefCell::new(PointerState::new()));
    info!(seed, "game started");

    on_page_hide({
        let game = game.clone();
        let persistence = persistence.clone();
        move || game.borrow().shutdown(&*persistence)
    });

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch handler
    terminal.on_mouse_event({
        let pointer = pointer.clone();
        move |mouse_event| {
            if mouse_event.button != MouseButton::Left
                && mouse_event.event != MouseEventKind::Moved
            {
                return;
            }
            let Some(pos) = dom_pixel_to_world(mouse_event.x, mouse_event.y) else {
                return;
            };
            let event = match mouse_event.event {
                MouseEventKind::Moved => InputEvent::Moved(pos),
                MouseEventKind::Pressed => InputEvent::Down(pos),
                MouseEventKind::Released => InputEvent::Up(pos),
                _ => return,
            };
            pointer.borrow_mut().handle(&event);
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let pointer = pointer.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                pointer.borrow_mut().handle(&InputEvent::Key(c));
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut timer = timer.borrow_mut();
        timer.update(now_ms());

        let mut pointer = pointer.borrow_mut();
        let mut game = game.borrow_mut();
        game.update(&*pointer, &*timer);

        let mut list = DrawList::new();
        game.draw(&mut list, &*pointer, timer.scene_time());
        pointer.end_frame();

        set_hand_cursor(list.hand_cursor);
        f.render_widget(SceneCanvas::new(&list), f.area());
    });

    Ok(())
}
