//! Display surface abstraction and a recording implementation.
//!
//! Games never talk to a graphics API. They draw through the [`Surface`]
//! trait, whose primitives mirror a 2D canvas: filled and stroked rectangles,
//! circles, lines, text, a global alpha, a save/restore translation stack,
//! and linear-gradient fills. All calls are immediate and synchronous.
//!
//! Two implementations ship with the engine:
//!
//! - [`DrawList`] records every primitive as a [`DrawCommand`] with the
//!   current alpha and translation already applied. Tests inspect it and the
//!   optional GPU renderer consumes it.
//! - [`NullSurface`] discards everything (headless runs).

use serde::{Deserialize, Serialize};

use crate::collision::Rect;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An opaque sRGB color. Transparency comes from the surface's global alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GOLD: Color = Color::rgb(0xFF, 0xD7, 0x00);
    /// Background the loop driver clears to every tick (`#87CEEB`).
    pub const SKY: Color = Color::rgb(0x87, 0xCE, 0xEB);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`. Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Move each channel `factor` of the way toward white.
    pub fn lighten(self, factor: f64) -> Self {
        let up = |c: u8| (c as f64 + (255.0 - c as f64) * factor).floor().min(255.0) as u8;
        Self::rgb(up(self.r), up(self.g), up(self.b))
    }

    /// Scale each channel by `1 - factor`.
    pub fn darken(self, factor: f64) -> Self {
        let down = |c: u8| (c as f64 * (1.0 - factor)).floor().max(0.0) as u8;
        Self::rgb(down(self.r), down(self.g), down(self.b))
    }

    /// Linear blend toward `other` by `t` in `[0, 1]`.
    pub fn mix(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::rgb(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
        )
    }

    /// Normalized RGBA with the given alpha.
    pub fn to_rgba(self, alpha: f64) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha.clamp(0.0, 1.0) as f32,
        ]
    }
}

// ---------------------------------------------------------------------------
// Text and gradients
// ---------------------------------------------------------------------------

/// Horizontal anchoring of text relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Fill color, font size, and alignment for [`Surface::fill_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in pixels (sans-serif).
    pub size_px: f64,
    pub align: TextAlign,
}

impl TextStyle {
    /// Centered text, matching the engine's `drawText` default.
    pub fn new(color: Color, size_px: f64) -> Self {
        Self {
            color,
            size_px,
            align: TextAlign::Center,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// A linear gradient between two points with ordered color stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    /// `(offset in [0, 1], color)` pairs, kept sorted by offset.
    pub stops: Vec<(f64, Color)>,
}

impl LinearGradient {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Top-to-bottom gradient spanning `y0..y1`.
    pub fn vertical(y0: f64, y1: f64) -> Self {
        Self::new((0.0, y0), (0.0, y1))
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self.stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }

    /// Color at a point, projected onto the gradient axis.
    pub fn color_at(&self, x: f64, y: f64) -> Color {
        let (dx, dy) = (self.end.0 - self.start.0, self.end.1 - self.start.1);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq > 0.0 {
            ((x - self.start.0) * dx + (y - self.start.1) * dy) / len_sq
        } else {
            0.0
        };
        self.color_at_offset(t)
    }

    /// Color at a normalized offset along the axis.
    pub fn color_at_offset(&self, t: f64) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::BLACK;
        };
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.0 {
                let span = b.0 - a.0;
                let local = if span > 0.0 { (t - a.0) / span } else { 1.0 };
                return a.1.mix(b.1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Immediate-mode 2D drawing target.
///
/// The global alpha and translation persist across calls until changed, like
/// canvas paint state. [`save`](Surface::save) / [`restore`](Surface::restore)
/// push and pop both.
pub trait Surface {
    /// Fill the whole surface, ignoring the current translation.
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, line_width: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &LinearGradient);
    fn set_alpha(&mut self, alpha: f64);
    fn alpha(&self) -> f64;
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
}

// ---------------------------------------------------------------------------
// DrawCommand / DrawList
// ---------------------------------------------------------------------------

/// One recorded primitive, in surface coordinates (translation applied).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
        alpha: f64,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f64,
        alpha: f64,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
        alpha: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        line_width: f64,
        alpha: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        style: TextStyle,
        alpha: f64,
    },
    GradientRect {
        rect: Rect,
        gradient: LinearGradient,
        alpha: f64,
    },
}

#[derive(Debug, Clone, Copy)]
struct PaintState {
    alpha: f64,
    tx: f64,
    ty: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

/// A [`Surface`] that records commands for later inspection or rendering.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands and reset paint state for the next frame.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.state = PaintState::default();
        self.stack.clear();
    }

    /// Current translation.
    pub fn translation(&self) -> (f64, f64) {
        (self.state.tx, self.state.ty)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn offset(&self, rect: Rect) -> Rect {
        rect.translated(self.state.tx, self.state.ty)
    }

    fn offset_point(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x + self.state.tx, y + self.state.ty)
    }
}

impl Surface for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.offset(rect);
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            alpha: self.state.alpha,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) {
        let rect = self.offset(rect);
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
            alpha: self.state.alpha,
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let (cx, cy) = self.offset_point((cx, cy));
        self.commands.push(DrawCommand::FillCircle {
            cx,
            cy,
            radius,
            color,
            alpha: self.state.alpha,
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, line_width: f64) {
        let (from, to) = (self.offset_point(from), self.offset_point(to));
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
            alpha: self.state.alpha,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        let (x, y) = self.offset_point((x, y));
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            style: style.clone(),
            alpha: self.state.alpha,
        });
    }

    fn fill_gradient_rect(&mut self, rect: Rect, gradient: &LinearGradient) {
        let rect = self.offset(rect);
        let mut gradient = gradient.clone();
        gradient.start = self.offset_point(gradient.start);
        gradient.end = self.offset_point(gradient.end);
        self.commands.push(DrawCommand::GradientRect {
            rect,
            gradient,
            alpha: self.state.alpha,
        });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn alpha(&self) -> f64 {
        self.state.alpha
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Unbalanced restore is ignored, like canvas.
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.tx += dx;
        self.state.ty += dy;
    }
}

/// A [`Surface`] that draws nothing. Used by headless runs.
#[derive(Debug, Clone)]
pub struct NullSurface {
    alpha: f64,
    stack: Vec<f64>,
}

impl NullSurface {
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            stack: Vec::new(),
        }
    }
}

impl Default for NullSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for NullSurface {
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _line_width: f64) {}
    fn fill_circle(&mut self, _cx: f64, _cy: f64, _radius: f64, _color: Color) {}
    fn line(&mut self, _from: (f64, f64), _to: (f64, f64), _color: Color, _line_width: f64) {}
    fn fill_text(&mut self, _text: &str, _x: f64, _y: f64, _style: &TextStyle) {}
    fn fill_gradient_rect(&mut self, _rect: Rect, _gradient: &LinearGradient) {}

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn save(&mut self) {
        self.stack.push(self.alpha);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.stack.pop() {
            self.alpha = alpha;
        }
    }

    fn translate(&mut self, _dx: f64, _dy: f64) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
