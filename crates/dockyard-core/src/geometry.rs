#![forbid(unsafe_code)]

//! Geometric primitives in logical pixels.

use serde::{Deserialize, Serialize};

/// A point in logical pixels (origin at top-left of the window).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Signed offset from `origin` to `self`.
    #[inline]
    #[must_use]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// A rectangle for layout bounds and hit testing.
///
/// Edges follow the half-open convention: `left`/`top` inclusive,
/// `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Position of `point` relative to this rectangle, as fractions of the
    /// width and height. `None` when the rectangle is empty.
    #[must_use]
    pub fn relative(&self, point: Point) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            (point.x - self.x) / self.width,
            (point.y - self.y) / self.height,
        ))
    }

    /// Split horizontally at `first_width`, leaving `gap` pixels between the halves.
    #[must_use]
    pub fn split_columns(&self, first_width: f64, gap: f64) -> (Rect, Rect, Rect) {
        let gap = gap.clamp(0.0, self.width.max(0.0));
        let first_width = first_width.clamp(0.0, (self.width - gap).max(0.0));
        let first = Rect::new(self.x, self.y, first_width, self.height);
        let handle = Rect::new(self.x + first_width, self.y, gap, self.height);
        let second = Rect::new(
            handle.right(),
            self.y,
            (self.right() - handle.right()).max(0.0),
            self.height,
        );
        (first, handle, second)
    }

    /// Split vertically at `first_height`, leaving `gap` pixels between the halves.
    #[must_use]
    pub fn split_rows(&self, first_height: f64, gap: f64) -> (Rect, Rect, Rect) {
        let gap = gap.clamp(0.0, self.height.max(0.0));
        let first_height = first_height.clamp(0.0, (self.height - gap).max(0.0));
        let first = Rect::new(self.x, self.y, self.width, first_height);
        let handle = Rect::new(self.x, self.y + first_height, self.width, gap);
        let second = Rect::new(
            self.x,
            handle.bottom(),
            self.width,
            (self.bottom() - handle.bottom()).max(0.0),
        );
        (first, handle, second)
    }

    /// Grow the rectangle by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            (self.width + amount * 2.0).max(0.0),
            (self.height + amount * 2.0).max(0.0),
        )
    }
}
