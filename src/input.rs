//! Pointer and keyboard input: hit regions, event normalization and the
//! pixel → world conversion.
//!
//! The game only reads input through `InputSource`; `PointerState` is the
//! implementation fed by the browser's mouse and key events.

use glam::DVec2;

use crate::actions::{action_for_key, Action};
use crate::config::{WORLD_HEIGHT, WORLD_WIDTH};

/// A clickable area in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    Circle { center: DVec2, radius: f64 },
    /// Axis-aligned rectangle from `min` spanning `size`.
    Rect { min: DVec2, size: DVec2 },
}

impl Region {
    pub fn contains(&self, point: DVec2) -> bool {
        match *self {
            Region::Circle { center, radius } => point.distance_squared(center) <= radius * radius,
            Region::Rect { min, size } => {
                let max = min + size;
                point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
            }
        }
    }
}

/// What the game loop may ask about input during one frame.
pub trait InputSource {
    /// Cursor position in world coordinates.
    fn cursor(&self) -> DVec2;

    /// Where the left button went down this frame, if it did.
    fn click_point(&self) -> Option<DVec2>;

    /// Left button went down over `region` this frame.
    /// Tested at the press position, not wherever the cursor went afterwards.
    fn clicked(&self, region: &Region) -> bool {
        self.click_point().is_some_and(|p| region.contains(p))
    }

    /// Left button is held with the cursor over `region`.
    fn pressed(&self, region: &Region) -> bool;

    /// Keyboard actions received this frame, in order.
    fn actions(&self) -> &[Action];

    fn is_over(&self, region: &Region) -> bool {
        region.contains(self.cursor())
    }
}

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a world position.
    Moved(DVec2),
    /// Left button / touch went down at a world position.
    Down(DVec2),
    /// Left button / touch released at a world position.
    Up(DVec2),
    /// A key press from keyboard.
    Key(char),
}

/// Pointer state accumulated between two frames.
#[derive(Clone, Debug, Default)]
pub struct PointerState {
    cursor: DVec2,
    held: bool,
    /// Position of the latest press since the last `end_frame`.
    down_at: Option<DVec2>,
    actions: Vec<Action>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Moved(pos) => self.cursor = pos,
            InputEvent::Down(pos) => {
                self.cursor = pos;
                self.held = true;
                self.down_at = Some(pos);
            }
            InputEvent::Up(pos) => {
                self.cursor = pos;
                self.held = false;
            }
            InputEvent::Key(c) => {
                if let Some(action) = action_for_key(c) {
                    self.actions.push(action);
                }
            }
        }
    }

    /// Forget per-frame edges. Call after the game has consumed the frame.
    pub fn end_frame(&mut self) {
        self.down_at = None;
        self.actions.clear();
    }
}

impl InputSource for PointerState {
    fn cursor(&self) -> DVec2 {
        self.cursor
    }

    fn click_point(&self) -> Option<DVec2> {
        self.down_at
    }

    fn pressed(&self, region: &Region) -> bool {
        self.held && region.contains(self.cursor)
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Convert a pixel position inside the drawing surface to world coordinates.
///
/// `(x, y)` is relative to the surface's top-left corner and `(width, height)`
/// is the surface size in pixels. The whole world is stretched over the surface.
///
/// Returns `None` if the position is outside the surface or inputs are invalid.
pub fn pixel_to_world(x: f64, y: f64, width: f64, height: f64) -> Option<DVec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    if x < 0.0 || y < 0.0 || x >= width || y >= height {
        return None;
    }
    Some(DVec2::new(x / width * WORLD_WIDTH, y / height * WORLD_HEIGHT))
}
