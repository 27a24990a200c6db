//! Geometry: points, rects, affine transforms and the window content view.
//!
//! All window and view geometry is in logical (CSS) pixels. The device-pixel
//! scale is applied only where canvases are sized or painted.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

/// A point in page, window-local or view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest whole pixel.
    #[must_use]
    pub fn round(self) -> Self {
        Self { x: self.x.round(), y: self.y.round() }
    }
}

/// A width/height pair in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `pt` lies inside the rect. The left/top edges are inclusive, right/bottom exclusive.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.y >= self.y && pt.x < self.max_x() && pt.y < self.max_y()
    }

    /// Smallest rect covering both `self` and `other`. Empty rects are ignored.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(x, y, self.max_x().max(other.max_x()) - x, self.max_y().max(other.max_y()) - y)
    }

    /// Overlap of `self` and `other`, or `None` when they do not intersect.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if max_x <= x || max_y <= y {
            return None;
        }
        Some(Rect::new(x, y, max_x - x, max_y - y))
    }

    /// Multiply every component by `factor` (logical → device pixels).
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Rect {
        Rect::new(self.x * factor, self.y * factor, self.width * factor, self.height * factor)
    }

    /// Expand outward to whole pixels.
    #[must_use]
    pub fn round_out(&self) -> Rect {
        let x = self.x.floor();
        let y = self.y.floor();
        Rect::new(x, y, self.max_x().ceil() - x, self.max_y().ceil() - y)
    }
}

/// A 2D affine transform `[a b c d e f]`, matching the canvas `setTransform` argument order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[must_use]
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[must_use]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `self` followed by `other`'s coordinate space: the canvas `transform()` semantics,
    /// where `other` is applied to points before `self`.
    #[must_use]
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, pt: Point) -> Point {
        Point {
            x: self.a * pt.x + self.c * pt.y + self.e,
            y: self.b * pt.x + self.d * pt.y + self.f,
        }
    }

    /// The six matrix entries in canvas argument order.
    #[must_use]
    pub fn matrix(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

/// Scroll/zoom applied to a window's content, mapping window-local points into view space.
///
/// `scroll_x` / `scroll_y` are in content pixels; `zoom` is a scale factor (1.0 = none).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentView {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub zoom: f64,
}

impl Default for ContentView {
    fn default() -> Self {
        Self { scroll_x: 0.0, scroll_y: 0.0, zoom: 1.0 }
    }
}

impl ContentView {
    /// Convert a window-local point into the content's coordinate space.
    #[must_use]
    pub fn local_to_content(&self, local: Point) -> Point {
        Point {
            x: local.x / self.zoom + self.scroll_x,
            y: local.y / self.zoom + self.scroll_y,
        }
    }

    /// Convert a content-space point back to window-local coordinates.
    #[must_use]
    pub fn content_to_local(&self, content: Point) -> Point {
        Point {
            x: (content.x - self.scroll_x) * self.zoom,
            y: (content.y - self.scroll_y) * self.zoom,
        }
    }
}
