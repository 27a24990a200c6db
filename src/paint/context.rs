//! The 2D canvas context seam.
//!
//! [`Context2d`] mirrors the subset of `CanvasRenderingContext2D` the painters
//! drive. The browser implementation lives in [`crate::dom`]; tests use a
//! recording double. Calls the browser can reject return `Result`.

use crate::error::PaintError;
use crate::geom::{Point, Rect, Transform};

use super::style::{Composite, GradientStop, ImageHandle, LineCap, LineJoin, SmoothingQuality};

/// A fill or stroke style in the form the canvas accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeStyle {
    /// A CSS color string.
    Css(String),
    /// A linear gradient in absolute (current user space) coordinates.
    LinearGradient { start: Point, end: Point, stops: Vec<GradientStop> },
    /// A repeating image pattern.
    Pattern(ImageHandle),
}

/// Canvas 2D drawing context operations.
pub trait Context2d {
    // --- State stack ---

    fn save(&mut self);
    fn restore(&mut self);

    // --- Transform ---

    /// Replace the current transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas rejects the matrix.
    fn set_transform(&mut self, transform: &Transform) -> Result<(), PaintError>;

    /// Multiply `transform` into the current transform.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas rejects the matrix.
    fn transform(&mut self, transform: &Transform) -> Result<(), PaintError>;

    // --- Style ---

    /// # Errors
    ///
    /// Returns `Err` if a gradient or pattern could not be created.
    fn set_fill_style(&mut self, style: &NativeStyle) -> Result<(), PaintError>;

    /// # Errors
    ///
    /// Returns `Err` if a gradient or pattern could not be created.
    fn set_stroke_style(&mut self, style: &NativeStyle) -> Result<(), PaintError>;

    fn set_line_width(&mut self, width: f64);

    /// # Errors
    ///
    /// Returns `Err` if the dash list is rejected.
    fn set_line_dash(&mut self, dash: &[f64]) -> Result<(), PaintError>;

    fn set_line_dash_offset(&mut self, offset: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f64);
    fn set_font(&mut self, css: &str);
    fn set_global_alpha(&mut self, alpha: f64);

    /// # Errors
    ///
    /// Returns `Err` if the operation name is rejected.
    fn set_composite(&mut self, composite: Composite) -> Result<(), PaintError>;

    /// `None` disables smoothing.
    fn set_image_smoothing(&mut self, quality: Option<SmoothingQuality>);

    // --- Paths ---

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn clip(&mut self);

    // --- Rects ---

    fn fill_rect(&mut self, rect: &Rect);
    fn stroke_rect(&mut self, rect: &Rect);
    fn clear_rect(&mut self, rect: &Rect);

    // --- Text ---

    /// # Errors
    ///
    /// Returns `Err` if the canvas fails to draw the text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), PaintError>;

    /// Advance width of `text` in the current font.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot measure text.
    fn measure_text(&mut self, text: &str) -> Result<f64, PaintError>;

    // --- Images ---

    /// Draw the `src` pixel rectangle of `image` into `dst`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the handle is not drawable by this backend.
    fn draw_image(&mut self, image: &ImageHandle, src: &Rect, dst: &Rect) -> Result<(), PaintError>;

    /// A copy of `image` resampled to `width × height` pixels.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the handle is not drawable or a scratch surface cannot be created.
    fn resample_image(&mut self, image: &ImageHandle, width: u32, height: u32) -> Result<ImageHandle, PaintError>;
}
