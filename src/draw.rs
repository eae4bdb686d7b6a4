//! Scene composition.
//!
//! The game describes a frame as a list of primitives handed to a `Surface`.
//! What the primitives look like on screen is up to the surface; the browser
//! front-end paints them onto a terminal canvas (see `render`).

use std::f64::consts::TAU;

use glam::DVec2;

use crate::config::{
    button_region, BACKGROUND_SPRITE_SCALE, COOKIE_CENTER, COUNTER_POS, CPS_LABEL_POS,
    HALO_RADIUS, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::effects::{EffectInstance, EffectKind};
use crate::game::Game;
use crate::input::{InputSource, Region};

pub const COOKIE_GLYPH: &str = "🍪";

/// Color with straight alpha, channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const DARK_GOLDENROD: Rgba = Rgba::new(0.722, 0.525, 0.043, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: f64, a: f64) -> Self {
        Self::new(v, v, v, a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Rgba, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Composite over an opaque backdrop.
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        Rgba::new(
            self.r * a + backdrop.r * (1.0 - a),
            self.g * a + backdrop.g * (1.0 - a),
            self.b * a + backdrop.b * (1.0 - a),
            1.0,
        )
    }
}

/// Where a text position sits relative to the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
    RightCenter,
}

/// One draw primitive in world coordinates (y grows downward).
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Full-screen vertical gradient.
    Gradient { top: Rgba, bottom: Rgba },
    Rect {
        min: DVec2,
        size: DVec2,
        fill: Rgba,
        frame: Rgba,
    },
    /// Circular sector; angles clockwise from straight up, in radians.
    Pie {
        center: DVec2,
        radius: f64,
        start: f64,
        sweep: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Sprite {
        glyph: String,
        center: DVec2,
        scale: f64,
        angle: f64,
        alpha: f64,
    },
    Text {
        text: String,
        pos: DVec2,
        size: f64,
        anchor: Anchor,
        color: Rgba,
    },
}

/// Receives one frame worth of primitives.
pub trait Surface {
    fn clear(&mut self);
    fn draw(&mut self, shape: Shape);
    /// Show a pointing-hand cursor this frame.
    fn request_hand_cursor(&mut self);
}

/// A `Surface` that records primitives in draw order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub shapes: Vec<Shape>,
    pub hand_cursor: bool,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn clear(&mut self) {
        self.shapes.clear();
        self.hand_cursor = false;
    }

    fn draw(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    fn request_hand_cursor(&mut self) {
        self.hand_cursor = true;
    }
}

/// Integer part with thousands separators, e.g. `1234567.8` → `"1,234,567"`.
pub fn format_thousands(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_thousands(-n));
    }
    let s = (n.floor() as u64).to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Compose the whole frame.
pub fn draw_scene(game: &Game, input: &impl InputSource, scene_time: f64, surface: &mut impl Surface) {
    surface.clear();
    surface.draw(Shape::Gradient {
        top: Rgba::WHITE,
        bottom: Rgba::DARK_GOLDENROD,
    });

    for effect in game.effects.background.iter() {
        draw_effect(effect, surface);
    }

    draw_halo(COOKIE_CENTER, scene_time, surface);

    let text = |text: String, pos: DVec2, size: f64| Shape::Text {
        text,
        pos,
        size,
        anchor: Anchor::Center,
        color: Rgba::WHITE,
    };
    surface.draw(text(format_thousands(game.economy.cookies), COUNTER_POS, 60.0));
    surface.draw(text(format!("毎秒: {}", game.cps()), CPS_LABEL_POS, 24.0));

    if input.is_over(&game.cookie_region()) {
        surface.request_hand_cursor();
    }
    surface.draw(Shape::Sprite {
        glyph: COOKIE_GLYPH.to_string(),
        center: COOKIE_CENTER,
        scale: game.spring.scale(),
        angle: 0.0,
        alpha: 1.0,
    });

    for effect in game.effects.foreground.iter() {
        draw_effect(effect, surface);
    }

    for index in 0..game.catalog().len() {
        draw_button(game, index, input, surface);
    }
}

/// Two counter-rotating fans of translucent wedges behind the cookie.
fn draw_halo(center: DVec2, scene_time: f64, surface: &mut impl Surface) {
    let spin = scene_time * 15f64.to_radians();
    let fans = [(4, spin, 60.0), (6, -spin, 40.0)];
    for (count, offset, sweep_deg) in fans {
        for i in 0..count {
            surface.draw(Shape::Pie {
                center,
                radius: HALO_RADIUS,
                start: (offset + TAU * i as f64 / count as f64).rem_euclid(TAU),
                sweep: f64::to_radians(sweep_deg),
                inner: Rgba::gray(1.0, 0.3),
                outer: Rgba::gray(1.0, 0.0),
            });
        }
    }
}

fn draw_effect(effect: &EffectInstance, surface: &mut impl Surface) {
    let alpha = effect.alpha();
    let pos = effect.position();
    let shape = match &effect.kind {
        EffectKind::BackgroundFall { angle } => Shape::Sprite {
            glyph: COOKIE_GLYPH.to_string(),
            center: pos,
            scale: BACKGROUND_SPRITE_SCALE,
            angle: *angle,
            alpha,
        },
        EffectKind::CookieBurst { scale, angle, .. } => Shape::Sprite {
            glyph: COOKIE_GLYPH.to_string(),
            center: pos,
            scale: *scale,
            angle: *angle,
            alpha,
        },
        EffectKind::PlusOneRise => Shape::Text {
            text: "+1".to_string(),
            pos,
            size: 24.0,
            anchor: Anchor::Center,
            color: Rgba::WHITE.with_alpha(alpha),
        },
    };
    surface.draw(shape);
}

fn draw_button(game: &Game, index: usize, input: &impl InputSource, surface: &mut impl Surface) {
    let item = &game.catalog()[index];
    let count = game.economy.item_counts[index];
    let enabled = game.economy.can_afford(game.catalog(), index);
    let Region::Rect { min, size } = button_region(index) else {
        return;
    };

    let (fill, frame) = if enabled {
        (Rgba::new(0.3, 0.5, 0.9, 0.8), Rgba::new(0.5, 0.7, 1.0, 1.0))
    } else {
        (Rgba::gray(0.0, 0.4), Rgba::gray(0.5, 1.0))
    };
    if enabled && input.is_over(&button_region(index)) {
        surface.request_hand_cursor();
    }
    surface.draw(Shape::Rect {
        min,
        size,
        fill,
        frame,
    });
    surface.draw(Shape::Sprite {
        glyph: item.emoji.clone(),
        center: min + DVec2::new(50.0, 50.0),
        scale: 0.5,
        angle: 0.0,
        alpha: 1.0,
    });
    let label = |text: String, pos: DVec2, size: f64, anchor: Anchor| Shape::Text {
        text,
        pos,
        size,
        anchor,
        color: Rgba::WHITE,
    };
    surface.draw(label(
        item.name.clone(),
        min + DVec2::new(100.0, 15.0),
        30.0,
        Anchor::TopLeft,
    ));
    surface.draw(label(
        format!("C{} / {} CPS", item.cost(count), item.cps),
        min + DVec2::new(102.0, 60.0),
        18.0,
        Anchor::TopLeft,
    ));
    surface.draw(label(
        count.to_string(),
        DVec2::new(min.x + size.x - 20.0, min.y + 50.0),
        50.0,
        Anchor::RightCenter,
    ));
}

/// Whether a world point is on screen.
pub fn on_screen(p: DVec2) -> bool {
    (0.0..WORLD_WIDTH).contains(&p.x) && (0.0..WORLD_HEIGHT).contains(&p.y)
}
