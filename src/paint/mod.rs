//! Render pipeline: the [`Painter`] contract and its two backends.
//!
//! - [`ImmediatePainter`] turns every call into canvas context calls as it is made.
//! - [`DeferredPainter`] records calls as opcodes with operands in separate
//!   numeric, string and object pools, and replays the whole batch against an
//!   immediate painter on [`DeferredPainter::flush`].
//!
//! Both honor the same paint-state stack ([`PaintState`]): `save` pushes a copy
//! of the current state, `restore` pops it, and each is paired one-to-one with
//! the canvas context's own `save` / `restore`.

pub mod context;
pub mod deferred;
pub mod immediate;
pub mod style;

pub use context::{Context2d, NativeStyle};
pub use deferred::{DeferredPainter, Op, Resource};
pub use immediate::ImmediatePainter;
pub use style::{
    Color, Composite, Font, GradientStop, Image, ImageHandle, LineCap, LineJoin, LinearGradient, Paint,
    SmoothingQuality, Stroke,
};

use crate::error::PaintError;
use crate::geom::{Rect, Transform};
use crate::shape::Shape;

/// The paint-state values saved and restored as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintState {
    pub paint: Paint,
    pub stroke: Stroke,
    pub font: Font,
    /// Logical transform, not including the device scale.
    pub transform: Transform,
    pub opacity: f64,
    pub composite: Composite,
    /// `0.0..=1.0`; see [`Painter::set_image_quality`].
    pub image_quality: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            paint: Paint::default(),
            stroke: Stroke::default(),
            font: Font::default(),
            transform: Transform::IDENTITY,
            opacity: 1.0,
            composite: Composite::SrcOver,
            image_quality: 0.5,
        }
    }
}

/// Vector drawing contract shared by the immediate and deferred painters.
///
/// Coordinates are logical pixels in the current transform's user space.
pub trait Painter {
    fn set_paint(&mut self, paint: &Paint);
    fn set_stroke(&mut self, stroke: &Stroke);
    fn set_font(&mut self, font: &Font);
    /// Replace the logical transform.
    fn set_transform(&mut self, transform: &Transform);
    /// Concatenate `transform` onto the current transform.
    fn transform(&mut self, transform: &Transform);
    fn set_opacity(&mut self, opacity: f64);
    fn set_composite(&mut self, composite: Composite);
    /// Image sampling quality: above 0.67 is high, above 0.33 medium, otherwise
    /// low with smoothing disabled.
    fn set_image_quality(&mut self, quality: f64);

    fn fill(&mut self, shape: &Shape);
    /// Stroke the outline of `shape`.
    fn draw(&mut self, shape: &Shape);
    fn clip(&mut self, shape: &Shape);
    /// Draw the `src` region of `image` (logical units) into `dst`.
    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect);
    /// Fill `text` with its baseline origin at `(x, y)`, adding `char_spacing` after each glyph.
    fn draw_string(&mut self, text: &str, x: f64, y: f64, char_spacing: f64);
    fn clear_rect(&mut self, rect: Rect);

    fn save(&mut self);

    /// Pop the paint state pushed by the matching [`Painter::save`].
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::UnbalancedRestore`] if there is no open `save`.
    fn restore(&mut self) -> Result<(), PaintError>;

    /// Number of open `save` calls.
    fn depth(&self) -> usize;

    /// Draw the whole image at its logical size with its top-left at `(x, y)`.
    fn draw_image_at(&mut self, image: &Image, x: f64, y: f64) {
        self.draw_image(image, image.bounds(), Rect::new(x, y, image.width, image.height));
    }
}
