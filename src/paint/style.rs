//! Paint-state values: colors, gradients, strokes, fonts, composites, images.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};

// =============================================================
// Color
// =============================================================

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string: `rgb(r,g,b)` when opaque, `rgba(r,g,b,alpha)` otherwise.
    #[must_use]
    pub fn css(&self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// =============================================================
// Paint
// =============================================================

/// One color stop of a gradient; `offset` is in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

/// A linear gradient whose endpoints are fractions of the painted shape's bounds.
///
/// `(0,0)` is the top-left of the shape, `(1,1)` the bottom-right, so the same
/// gradient stretches over whatever it fills.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// A gradient from `start` to `end` (relative coordinates) through `stops`.
    #[must_use]
    pub fn new(start: Point, end: Point, stops: Vec<GradientStop>) -> Self {
        Self { start, end, stops }
    }

    /// Absolute endpoints for a shape with the given bounds.
    #[must_use]
    pub fn endpoints_for(&self, bounds: &Rect) -> (Point, Point) {
        let at = |p: Point| Point::new(bounds.x + p.x * bounds.width, bounds.y + p.y * bounds.height);
        (at(self.start), at(self.end))
    }
}

/// What fills and strokes are painted with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(Color),
    Gradient(LinearGradient),
    /// Tile an image across the shape.
    Pattern(Image),
}

impl Paint {
    /// Whether this paint has to be rebuilt for every shape it is applied to.
    #[must_use]
    pub fn is_shape_relative(&self) -> bool {
        !matches!(self, Self::Color(_))
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::Color(Color::BLACK)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

// =============================================================
// Stroke
// =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// Stroke geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub width: f64,
    /// Alternating dash and gap lengths; empty for a solid line.
    pub dash: Vec<f64>,
    pub dash_offset: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
}

impl Stroke {
    /// A solid stroke of the given width with default caps and joins.
    #[must_use]
    pub fn solid(width: f64) -> Self {
        Self { width, ..Self::default() }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            dash: Vec::new(),
            dash_offset: 0.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

// =============================================================
// Font
// =============================================================

/// A font by family, size and style. Glyph metrics come from the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    /// Size in logical pixels.
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Font {
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self { family: family.into(), size, bold: false, italic: false }
    }

    #[must_use]
    pub fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    #[must_use]
    pub fn italic(self) -> Self {
        Self { italic: true, ..self }
    }

    /// CSS font shorthand, e.g. `italic bold 12px Arial`.
    #[must_use]
    pub fn css(&self) -> String {
        let mut css = String::new();
        if self.italic {
            css.push_str("italic ");
        }
        if self.bold {
            css.push_str("bold ");
        }
        css.push_str(&format!("{}px {}", self.size, self.family));
        css
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", 12.0)
    }
}

// =============================================================
// Composite
// =============================================================

/// Porter-Duff composite mode for subsequent drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composite {
    #[default]
    SrcOver,
    SrcIn,
    DstIn,
    DstOut,
}

impl Composite {
    /// The canvas `globalCompositeOperation` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::SrcOver => "source-over",
            Self::SrcIn => "source-in",
            Self::DstIn => "destination-in",
            Self::DstOut => "destination-out",
        }
    }

    /// Parse a `globalCompositeOperation` value this crate emits.
    #[must_use]
    pub fn from_css(css: &str) -> Option<Self> {
        match css {
            "source-over" => Some(Self::SrcOver),
            "source-in" => Some(Self::SrcIn),
            "destination-in" => Some(Self::DstIn),
            "destination-out" => Some(Self::DstOut),
            _ => None,
        }
    }
}

/// Canvas image smoothing quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingQuality {
    Low,
    Medium,
    High,
}

impl SmoothingQuality {
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// =============================================================
// Images
// =============================================================

/// Opaque handle to something the canvas can draw (an image or canvas element).
///
/// The backend that created the handle is the only one that can look inside it.
#[derive(Clone)]
pub struct ImageHandle(Rc<dyn Any>);

impl ImageHandle {
    pub fn new<T: Any>(native: T) -> Self {
        Self(Rc::new(native))
    }

    /// The native object, if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageHandle").field(&Rc::as_ptr(&self.0)).finish()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A decoded image with a logical size and a (possibly larger) pixel size.
///
/// `handle` is `None` until the decoder has produced something drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    pub pix_width: u32,
    pub pix_height: u32,
    pub handle: Option<ImageHandle>,
}

impl Image {
    /// An image whose pixel size equals its logical size.
    #[must_use]
    pub fn new(handle: ImageHandle, width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            pix_width: width,
            pix_height: height,
            handle: Some(handle),
        }
    }

    /// An image with `scale` device pixels per logical pixel.
    #[must_use]
    pub fn hidpi(handle: ImageHandle, pix_width: u32, pix_height: u32, scale: f64) -> Self {
        Self {
            width: f64::from(pix_width) / scale,
            height: f64::from(pix_height) / scale,
            pix_width,
            pix_height,
            handle: Some(handle),
        }
    }

    /// An image that has not been decoded yet.
    #[must_use]
    pub fn pending(width: f64, height: f64) -> Self {
        Self { width, height, pix_width: 0, pix_height: 0, handle: None }
    }

    /// Pixel-to-logical ratio on each axis.
    #[must_use]
    pub fn pixel_ratio(&self) -> (f64, f64) {
        if self.width <= 0.0 || self.height <= 0.0 {
            return (1.0, 1.0);
        }
        (f64::from(self.pix_width) / self.width, f64::from(self.pix_height) / self.height)
    }

    /// Whether the pixel size differs from the logical size.
    #[must_use]
    pub fn is_hidpi(&self) -> bool {
        (f64::from(self.pix_width) - self.width).abs() >= 0.5 || (f64::from(self.pix_height) - self.height).abs() >= 0.5
    }

    /// Logical bounds at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
