//! Immediate painter: each call becomes canvas context calls right away.

#[cfg(test)]
#[path = "immediate_test.rs"]
mod immediate_test;

use crate::consts::{IMAGE_QUALITY_HIGH, IMAGE_QUALITY_MEDIUM, PAINT_EPSILON};
use crate::error::PaintError;
use crate::geom::{Rect, Transform};
use crate::shape::{PathSeg, Shape};

use super::context::{Context2d, NativeStyle};
use super::style::{Composite, Font, Image, ImageHandle, Paint, SmoothingQuality, Stroke};
use super::{PaintState, Painter};

/// Which of the two canvas styles a shape-relative paint is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Fill,
    Stroke,
}

/// Paints directly into a [`Context2d`].
///
/// The device scale is folded into every transform sent to the context, so
/// callers always work in logical pixels. State setters skip the context call
/// when the value is unchanged.
pub struct ImmediatePainter<C: Context2d> {
    ctx: C,
    scale: f64,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl<C: Context2d> ImmediatePainter<C> {
    /// A painter over `ctx` for a backing store with `scale` device pixels per logical pixel.
    pub fn new(ctx: C, scale: f64) -> Self {
        let mut painter = Self { ctx, scale, state: PaintState::default(), stack: Vec::new() };
        painter.sync_context();
        painter
    }

    #[must_use]
    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    #[must_use]
    pub fn state(&self) -> &PaintState {
        &self.state
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Install a color paint whose CSS form is already known.
    pub(crate) fn set_css_paint(&mut self, paint: &Paint, css: &str) {
        if self.state.paint == *paint {
            return;
        }
        self.state.paint = paint.clone();
        let style = NativeStyle::Css(css.to_owned());
        log_failure("set fill style", self.ctx.set_fill_style(&style));
        log_failure("set stroke style", self.ctx.set_stroke_style(&style));
    }

    /// Install a font whose CSS form is already known.
    pub(crate) fn set_css_font(&mut self, font: &Font, css: &str) {
        if self.state.font == *font {
            return;
        }
        self.state.font = font.clone();
        self.ctx.set_font(css);
    }

    /// Draw `image` through an already resolved drawable.
    pub(crate) fn draw_drawable(&mut self, image: &Image, handle: &ImageHandle, src: Rect, dst: Rect) {
        // Source rect is logical; the drawable is addressed in pixels.
        let (sx, sy) = image.pixel_ratio();
        let src = Rect::new(src.x * sx, src.y * sy, src.width * sx, src.height * sy);
        log_failure("draw image", self.ctx.draw_image(handle, &src, &dst));
    }

    /// Change the device scale and re-send the current transform.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.send_transform();
    }

    /// Push the whole current state onto the context, e.g. after the canvas was resized.
    pub fn sync_context(&mut self) {
        self.send_transform();
        if let Paint::Color(color) = &self.state.paint {
            let style = NativeStyle::Css(color.css());
            log_failure("set fill style", self.ctx.set_fill_style(&style));
            log_failure("set stroke style", self.ctx.set_stroke_style(&style));
        }
        let stroke = self.state.stroke.clone();
        self.send_stroke(&stroke);
        self.ctx.set_font(&self.state.font.css());
        self.ctx.set_global_alpha(self.state.opacity);
        log_failure("set composite", self.ctx.set_composite(self.state.composite));
        self.ctx.set_image_smoothing(smoothing_for(self.state.image_quality));
    }

    fn send_transform(&mut self) {
        let device = Transform::scale(self.scale, self.scale).then(&self.state.transform);
        log_failure("set transform", self.ctx.set_transform(&device));
    }

    fn send_stroke(&mut self, stroke: &Stroke) {
        self.ctx.set_line_width(stroke.width);
        log_failure("set line dash", self.ctx.set_line_dash(&stroke.dash));
        self.ctx.set_line_dash_offset(stroke.dash_offset);
        self.ctx.set_line_cap(stroke.cap);
        self.ctx.set_line_join(stroke.join);
        self.ctx.set_miter_limit(stroke.miter_limit);
    }

    /// Install a gradient or pattern paint for a shape with `bounds`.
    ///
    /// Returns `false` if the paint cannot be resolved and the drawing should be skipped.
    fn apply_shape_paint(&mut self, bounds: &Rect, target: Target) -> bool {
        let style = match &self.state.paint {
            Paint::Color(_) => return true,
            Paint::Gradient(gradient) => {
                let (start, end) = gradient.endpoints_for(bounds);
                NativeStyle::LinearGradient { start, end, stops: gradient.stops.clone() }
            }
            Paint::Pattern(image) => {
                let image = image.clone();
                match self.pattern_source(&image) {
                    Some(handle) => NativeStyle::Pattern(handle),
                    None => return false,
                }
            }
        };
        let result = match target {
            Target::Fill => self.ctx.set_fill_style(&style),
            Target::Stroke => self.ctx.set_stroke_style(&style),
        };
        if let Err(e) = result {
            log::warn!("shape paint skipped: {e}");
            return false;
        }
        true
    }

    /// The drawable for a pattern, reduced to logical size if the image is hidpi.
    ///
    /// Canvas patterns tile at raw pixel density, so a hidpi image would
    /// otherwise pick up the device scale twice.
    fn pattern_source(&mut self, image: &Image) -> Option<ImageHandle> {
        let Some(handle) = image.handle.as_ref() else {
            log::warn!("pattern image not loaded; fill skipped");
            return None;
        };
        if !image.is_hidpi() {
            return Some(handle.clone());
        }
        match self.ctx.resample_image(handle, to_px(image.width), to_px(image.height)) {
            Ok(reduced) => Some(reduced),
            Err(e) => {
                log::warn!("pattern downsample failed: {e}");
                None
            }
        }
    }

    fn trace(&mut self, shape: &Shape) {
        self.ctx.begin_path();
        for seg in shape.segments() {
            match seg {
                PathSeg::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathSeg::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathSeg::CubicTo(c1, c2, p) => self.ctx.bezier_curve_to(c1, c2, p),
                PathSeg::Close => self.ctx.close_path(),
            }
        }
    }
}

impl<C: Context2d> Painter for ImmediatePainter<C> {
    fn set_paint(&mut self, paint: &Paint) {
        match paint {
            Paint::Color(color) => self.set_css_paint(paint, &color.css()),
            // Gradients and patterns are built per shape in fill/draw.
            Paint::Gradient(_) | Paint::Pattern(_) => self.state.paint = paint.clone(),
        }
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        if self.state.stroke == *stroke {
            return;
        }
        self.state.stroke = stroke.clone();
        self.send_stroke(stroke);
    }

    fn set_font(&mut self, font: &Font) {
        self.set_css_font(font, &font.css());
    }

    fn set_transform(&mut self, transform: &Transform) {
        if self.state.transform == *transform {
            return;
        }
        self.state.transform = *transform;
        self.send_transform();
    }

    fn transform(&mut self, transform: &Transform) {
        if transform.is_identity() {
            return;
        }
        self.state.transform = self.state.transform.then(transform);
        log_failure("transform", self.ctx.transform(transform));
    }

    fn set_opacity(&mut self, opacity: f64) {
        if (self.state.opacity - opacity).abs() < PAINT_EPSILON {
            return;
        }
        self.state.opacity = opacity;
        self.ctx.set_global_alpha(opacity);
    }

    fn set_composite(&mut self, composite: Composite) {
        if self.state.composite == composite {
            return;
        }
        self.state.composite = composite;
        log_failure("set composite", self.ctx.set_composite(composite));
    }

    fn set_image_quality(&mut self, quality: f64) {
        if (self.state.image_quality - quality).abs() < PAINT_EPSILON {
            return;
        }
        self.state.image_quality = quality;
        self.ctx.set_image_smoothing(smoothing_for(quality));
    }

    fn fill(&mut self, shape: &Shape) {
        if !self.apply_shape_paint(&shape.bounds(), Target::Fill) {
            return;
        }
        match shape {
            Shape::Rect(rect) => self.ctx.fill_rect(rect),
            Shape::Path(_) => {
                self.trace(shape);
                self.ctx.fill();
            }
        }
    }

    fn draw(&mut self, shape: &Shape) {
        if !self.apply_shape_paint(&shape.bounds(), Target::Stroke) {
            return;
        }
        match shape {
            Shape::Rect(rect) => self.ctx.stroke_rect(rect),
            Shape::Path(_) => {
                self.trace(shape);
                self.ctx.stroke();
            }
        }
    }

    fn clip(&mut self, shape: &Shape) {
        self.trace(shape);
        self.ctx.clip();
    }

    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect) {
        let Some(handle) = image.handle.as_ref() else {
            log::warn!("image not loaded; draw skipped");
            return;
        };
        self.draw_drawable(image, handle, src, dst);
    }

    fn draw_string(&mut self, text: &str, x: f64, y: f64, char_spacing: f64) {
        if char_spacing.abs() < PAINT_EPSILON {
            log_failure("fill text", self.ctx.fill_text(text, x, y));
            return;
        }
        let mut pen_x = x;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let glyph: &str = ch.encode_utf8(&mut buf);
            if let Err(e) = self.ctx.fill_text(glyph, pen_x, y) {
                log::warn!("fill text: {e}");
                return;
            }
            match self.ctx.measure_text(glyph) {
                Ok(advance) => pen_x += advance + char_spacing,
                Err(e) => {
                    log::warn!("measure text: {e}");
                    return;
                }
            }
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx.clear_rect(&rect);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.ctx.save();
    }

    fn restore(&mut self) -> Result<(), PaintError> {
        let Some(saved) = self.stack.pop() else {
            log::error!("painter restore without matching save");
            return Err(PaintError::UnbalancedRestore);
        };
        self.state = saved;
        self.ctx.restore();
        Ok(())
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Canvas smoothing setting for an image quality value.
#[must_use]
pub fn smoothing_for(quality: f64) -> Option<SmoothingQuality> {
    if quality > IMAGE_QUALITY_HIGH {
        Some(SmoothingQuality::High)
    } else if quality > IMAGE_QUALITY_MEDIUM {
        Some(SmoothingQuality::Medium)
    } else {
        None
    }
}

/// Logical length to whole pixels, at least one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_px(len: f64) -> u32 {
    len.round().max(1.0) as u32
}

fn log_failure(op: &str, result: Result<(), PaintError>) {
    if let Err(e) = result {
        log::warn!("{op}: {e}");
    }
}
