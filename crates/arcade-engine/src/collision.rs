//! Axis-aligned bounding boxes and the overlap test every game builds on.
//!
//! [`Rect`] is the collision unit for everything in a game: players,
//! coins, platforms, falling hazards. Rects carry no identity; games create
//! and discard them freely. [`GameObject`] is the base object model that
//! pairs a rect with a velocity.

use serde::{Deserialize, Serialize};

use crate::surface::{Color, Surface};

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge (y grows downward).
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Create a rect from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The same rect moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether this rect overlaps `other`. See [`overlaps`].
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Strict AABB overlap test.
///
/// Rects that only share an edge do NOT overlap: every comparison is a strict
/// inequality.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

// ---------------------------------------------------------------------------
// GameObject
// ---------------------------------------------------------------------------

/// Base object model: bounds plus a per-tick velocity and a fill color.
///
/// Games compose their entities from this (or from a bare [`Rect`] when an
/// entity never moves).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Current bounds.
    pub bounds: Rect,
    /// Horizontal velocity in pixels per tick.
    pub vx: f64,
    /// Vertical velocity in pixels per tick.
    pub vy: f64,
    /// Fill color used by [`render`](Self::render).
    pub color: Color,
    /// Inactive objects are skipped by games and eventually compacted away.
    pub active: bool,
}

impl GameObject {
    /// Default fill color for objects that don't pick one (`#FF6B6B`).
    pub const DEFAULT_COLOR: Color = Color::rgb(0xFF, 0x6B, 0x6B);

    /// Create a stationary, active object.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(x, y, width, height),
            vx: 0.0,
            vy: 0.0,
            color: Self::DEFAULT_COLOR,
            active: true,
        }
    }

    /// Builder-style color override.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Move by one tick of velocity. The frame delta is accepted for
    /// signature parity with games but movement is per tick.
    pub fn update(&mut self, _delta_ms: f64) {
        self.bounds.x += self.vx;
        self.bounds.y += self.vy;
    }

    /// Draw as a filled rectangle.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.bounds, self.color);
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Overlap test against another object.
    pub fn overlaps(&self, other: &GameObject) -> bool {
        overlaps(&self.bounds, &other.bounds)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
