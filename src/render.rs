//! Terminal painter for a recorded `DrawList`.
//!
//! The 800×600 world is stretched over the widget area with a braille
//! canvas. Alpha is approximated by blending each color over the background
//! gradient at the same height.

use ratzilla::ratatui::buffer::Buffer;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::symbols::Marker;
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::canvas::{Canvas, Circle, Context, Line as Segment};
use ratzilla::ratatui::widgets::Widget;

use crate::config::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::draw::{on_screen, Anchor, DrawList, Rgba, Shape, COOKIE_GLYPH};

/// Emoji textures are 136px squares before scaling.
const SPRITE_SIZE: f64 = 136.0;
const COOKIE_DOUGH: Rgba = Rgba::new(0.78, 0.56, 0.28, 1.0);
const CHOCOLATE: Rgba = Rgba::new(0.35, 0.2, 0.1, 1.0);
/// Angular spacing of the rays that fill a pie wedge.
const PIE_RAY_STEP: f64 = 0.05;

pub fn to_color(c: Rgba) -> Color {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(c.r), channel(c.g), channel(c.b))
}

/// Canvas y grows upward; world y grows downward.
fn flip(y: f64) -> f64 {
    WORLD_HEIGHT - y
}

/// Unit vector for an angle measured clockwise from straight up.
fn heading(angle: f64) -> (f64, f64) {
    (angle.sin(), -angle.cos())
}

pub struct SceneCanvas<'a> {
    list: &'a DrawList,
}

impl<'a> SceneCanvas<'a> {
    pub fn new(list: &'a DrawList) -> Self {
        Self { list }
    }

    fn gradient(&self) -> (Rgba, Rgba) {
        self.list
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Gradient { top, bottom } => Some((*top, *bottom)),
                _ => None,
            })
            .unwrap_or((Rgba::gray(0.0, 1.0), Rgba::gray(0.0, 1.0)))
    }
}

/// Per-frame painting parameters shared by all shapes.
struct Painter {
    gradient: (Rgba, Rgba),
    /// World units per terminal column / row.
    cell: (f64, f64),
}

impl Painter {
    fn backdrop(&self, world_y: f64) -> Rgba {
        let (top, bottom) = self.gradient;
        top.lerp(bottom, world_y / WORLD_HEIGHT)
    }

    fn color_at(&self, c: Rgba, world_y: f64) -> Color {
        to_color(c.over(self.backdrop(world_y)))
    }

    fn paint(&self, ctx: &mut Context, shape: &Shape) {
        match shape {
            Shape::Gradient { .. } => {}
            Shape::Rect {
                min,
                size,
                fill,
                frame,
            } => {
                // Braille dots are 4 per row
                let step = self.cell.1 / 4.0;
                let mut y = min.y;
                while y < min.y + size.y {
                    ctx.draw(&Segment::new(
                        min.x,
                        flip(y),
                        min.x + size.x,
                        flip(y),
                        self.color_at(*fill, y),
                    ));
                    y += step;
                }
                let color = self.color_at(*frame, min.y);
                let (x0, y0, x1, y1) = (min.x, flip(min.y), min.x + size.x, flip(min.y + size.y));
                for (ax, ay, bx, by) in [(x0, y0, x1, y0), (x1, y0, x1, y1), (x1, y1, x0, y1), (x0, y1, x0, y0)] {
                    ctx.draw(&Segment::new(ax, ay, bx, by, color));
                }
            }
            Shape::Pie {
                center,
                radius,
                start,
                sweep,
                inner,
                outer,
            } => {
                let rays = (sweep / PIE_RAY_STEP).ceil().max(1.0) as usize;
                for i in 0..=rays {
                    let (dx, dy) = heading(start + sweep * i as f64 / rays as f64);
                    // Three bands fading from the inner to the outer color
                    for band in 0..3 {
                        let r0 = radius * band as f64 / 3.0;
                        let r1 = radius * (band + 1) as f64 / 3.0;
                        let c = inner.lerp(*outer, (band as f64 + 0.5) / 3.0);
                        ctx.draw(&Segment::new(
                            center.x + dx * r0,
                            flip(center.y + dy * r0),
                            center.x + dx * r1,
                            flip(center.y + dy * r1),
                            self.color_at(c, center.y),
                        ));
                    }
                }
            }
            Shape::Sprite {
                glyph,
                center,
                scale,
                angle,
                alpha,
            } => {
                if *alpha <= 0.0 {
                    return;
                }
                if glyph == COOKIE_GLYPH {
                    let radius = SPRITE_SIZE * scale / 2.0;
                    ctx.draw(&Circle {
                        x: center.x,
                        y: flip(center.y),
                        radius,
                        color: self.color_at(COOKIE_DOUGH.with_alpha(*alpha), center.y),
                    });
                    // A chip on the rim shows the rotation
                    let (dx, dy) = heading(*angle);
                    ctx.draw(&Segment::new(
                        center.x + dx * radius * 0.3,
                        flip(center.y + dy * radius * 0.3),
                        center.x + dx * radius * 0.7,
                        flip(center.y + dy * radius * 0.7),
                        self.color_at(CHOCOLATE.with_alpha(*alpha), center.y),
                    ));
                }
                if *alpha >= 0.3 && on_screen(*center) {
                    self.label(ctx, glyph, *center, Anchor::Center, Style::default());
                }
            }
            Shape::Text {
                text,
                pos,
                size,
                anchor,
                color,
            } => {
                if color.a <= 0.0 {
                    return;
                }
                let mut style = Style::default().fg(self.color_at(*color, pos.y));
                if *size >= 30.0 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                self.label(ctx, text, *pos, *anchor, style);
            }
        }
    }

    fn label(&self, ctx: &mut Context, text: &str, pos: glam::DVec2, anchor: Anchor, style: Style) {
        let line = Line::from(Span::styled(text.to_string(), style));
        let width = line.width() as f64 * self.cell.0;
        let (x, y) = match anchor {
            Anchor::Center => (pos.x - width / 2.0, pos.y),
            Anchor::TopLeft => (pos.x, pos.y + self.cell.1 / 2.0),
            Anchor::RightCenter => (pos.x - width, pos.y),
        };
        ctx.print(x.max(0.0), flip(y), line);
    }
}

impl Widget for SceneCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let painter = Painter {
            gradient: self.gradient(),
            cell: (
                WORLD_WIDTH / area.width as f64,
                WORLD_HEIGHT / area.height as f64,
            ),
        };

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, WORLD_WIDTH])
            .y_bounds([0.0, WORLD_HEIGHT])
            .paint(|ctx| {
                for shape in &self.list.shapes {
                    painter.paint(ctx, shape);
                }
            })
            .render(area, buf);

        // Canvas resets the background of the whole area, so the gradient goes on last.
        // Only `bg` is set; the painted symbols and their colors stay.
        for row in 0..area.height {
            let world_y = (row as f64 + 0.5) * painter.cell.1;
            let bg = to_color(painter.backdrop(world_y));
            buf.set_style(
                Rect::new(area.x, area.y + row, area.width, 1),
                Style::default().bg(bg),
            );
        }
    }
}
