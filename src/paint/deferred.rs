//! Deferred painter: records drawing calls and replays them in one batch.
//!
//! Each call appends an [`Op`] to the instruction stream. Its operands go to
//! one of three pools: numbers, strings, or [`Resource`] objects. Nothing
//! touches a canvas until [`DeferredPainter::flush`]. It resolves every
//! object operand to its [`NativeResource`] form once, then replays the
//! stream against an [`ImmediatePainter`] from those forms inside a
//! save/restore pair, so a batch cannot leak paint state into whatever the
//! target draws next.

#[cfg(test)]
#[path = "deferred_test.rs"]
mod deferred_test;

use crate::error::PaintError;
use crate::geom::{Rect, Transform};
use crate::shape::{Path, PathSeg, Shape};

use super::context::Context2d;
use super::immediate::ImmediatePainter;
use super::style::{Composite, Font, Image, ImageHandle, Paint, Stroke};
use super::Painter;

/// One recorded instruction. Operand counts are fixed per opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// numbers: x, y
    MoveTo,
    /// numbers: x, y
    LineTo,
    /// numbers: c1x, c1y, c2x, c2y, x, y
    CubicTo,
    ClosePath,
    /// Fill the path built since the last path-consuming op.
    FillPath,
    StrokePath,
    ClipPath,
    /// numbers: x, y, w, h
    FillRect,
    /// numbers: x, y, w, h
    StrokeRect,
    /// numbers: x, y, w, h
    ClearRect,
    /// object: image; numbers: src x, y, w, h, dst x, y, w, h
    DrawImage,
    /// string: text; numbers: x, y, char spacing
    DrawString,
    /// object: paint
    SetPaint,
    /// object: stroke
    SetStroke,
    /// object: font
    SetFont,
    /// numbers: a, b, c, d, e, f
    SetTransform,
    /// numbers: a, b, c, d, e, f
    Transform,
    /// numbers: opacity
    SetOpacity,
    /// string: composite operation name
    SetComposite,
    /// numbers: quality
    SetImageQuality,
    Save,
    Restore,
}

/// An object operand: something with a canvas-native form.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Paint(Paint),
    Stroke(Stroke),
    Font(Font),
    Image(Image),
}

/// The canvas-native form a [`Resource`] resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeResource {
    /// A CSS string: a color or a font.
    Css(String),
    /// Something the canvas can draw or tile.
    Drawable(ImageHandle),
    /// Built against each shape's bounds when drawn (gradients, strokes).
    PerShape,
}

impl Resource {
    /// Resolve to the canvas-native form.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::Context`] for an image (or image pattern) that has not been decoded.
    pub fn resolve(&self) -> Result<NativeResource, PaintError> {
        match self {
            Self::Paint(Paint::Color(color)) => Ok(NativeResource::Css(color.css())),
            Self::Paint(Paint::Gradient(_)) | Self::Stroke(_) => Ok(NativeResource::PerShape),
            Self::Paint(Paint::Pattern(image)) | Self::Image(image) => image
                .handle
                .clone()
                .map(NativeResource::Drawable)
                .ok_or_else(|| PaintError::Context("image has no drawable source".to_owned())),
            Self::Font(font) => Ok(NativeResource::Css(font.css())),
        }
    }
}

/// Records [`Painter`] calls for later replay.
#[derive(Debug, Default)]
pub struct DeferredPainter {
    ops: Vec<Op>,
    numbers: Vec<f64>,
    strings: Vec<String>,
    objects: Vec<Resource>,
    depth: usize,
}

impl DeferredPainter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Discard everything recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.numbers.clear();
        self.strings.clear();
        self.objects.clear();
        self.depth = 0;
    }

    /// Replay the recorded batch against `target` and clear it.
    ///
    /// Object operands that fail to resolve are logged. An unresolved image is
    /// not drawn. An unresolved paint is still installed, so the shapes painted
    /// with it are skipped exactly as the immediate painter skips them. The rest
    /// of the batch still runs.
    ///
    /// # Errors
    ///
    /// Returns [`PaintError::UnclosedSave`] (and discards the batch) if a `save`
    /// is still open, or [`PaintError::MalformedBatch`] if the operand pools are
    /// inconsistent with the ops.
    pub fn flush<C: Context2d>(&mut self, target: &mut ImmediatePainter<C>) -> Result<(), PaintError> {
        if self.depth != 0 {
            let depth = self.depth;
            log::error!("deferred batch rejected: {depth} unmatched save(s)");
            self.clear();
            return Err(PaintError::UnclosedSave(depth));
        }
        let resolved: Vec<Result<NativeResource, PaintError>> = self
            .objects
            .iter()
            .map(|object| {
                let native = object.resolve();
                if let Err(e) = &native {
                    log::warn!("deferred operand unresolved: {e}");
                }
                native
            })
            .collect();

        let base = target.depth();
        target.save();
        let result = self.replay(target, &resolved);
        // Unwind to where the batch started, even if replay stopped early.
        while target.depth() > base {
            target.restore()?;
        }
        self.clear();
        result
    }

    fn replay<C: Context2d>(
        &self,
        target: &mut ImmediatePainter<C>,
        resolved: &[Result<NativeResource, PaintError>],
    ) -> Result<(), PaintError> {
        let mut cur = Operands::new(self);
        let mut path = Path::new();
        for &op in &self.ops {
            match op {
                Op::MoveTo => {
                    let [x, y] = cur.numbers::<2>("move-to")?;
                    path.move_to(x, y);
                }
                Op::LineTo => {
                    let [x, y] = cur.numbers::<2>("line-to")?;
                    path.line_to(x, y);
                }
                Op::CubicTo => {
                    let [c1x, c1y, c2x, c2y, x, y] = cur.numbers::<6>("cubic-to")?;
                    path.cubic_to(c1x, c1y, c2x, c2y, x, y);
                }
                Op::ClosePath => {
                    path.close();
                }
                Op::FillPath => target.fill(&Shape::Path(std::mem::take(&mut path))),
                Op::StrokePath => target.draw(&Shape::Path(std::mem::take(&mut path))),
                Op::ClipPath => target.clip(&Shape::Path(std::mem::take(&mut path))),
                Op::FillRect => target.fill(&Shape::Rect(cur.rect("fill-rect")?)),
                Op::StrokeRect => target.draw(&Shape::Rect(cur.rect("stroke-rect")?)),
                Op::ClearRect => target.clear_rect(cur.rect("clear-rect")?),
                Op::DrawImage => {
                    let (index, object) = cur.object("draw-image")?;
                    let src = cur.rect("draw-image")?;
                    let dst = cur.rect("draw-image")?;
                    if let (Resource::Image(image), Some(Ok(NativeResource::Drawable(handle)))) =
                        (object, resolved.get(index))
                    {
                        target.draw_drawable(image, handle, src, dst);
                    }
                }
                Op::DrawString => {
                    let text = cur.string("draw-string")?;
                    let [x, y, spacing] = cur.numbers::<3>("draw-string")?;
                    target.draw_string(text, x, y, spacing);
                }
                Op::SetPaint => {
                    let (index, object) = cur.object("set-paint")?;
                    match (object, resolved.get(index)) {
                        (Resource::Paint(paint), Some(Ok(NativeResource::Css(css)))) => target.set_css_paint(paint, css),
                        (Resource::Paint(paint), _) => target.set_paint(paint),
                        _ => log::warn!("set-paint operand is not a paint"),
                    }
                }
                Op::SetStroke => {
                    if let (_, Resource::Stroke(stroke)) = cur.object("set-stroke")? {
                        target.set_stroke(stroke);
                    }
                }
                Op::SetFont => {
                    let (index, object) = cur.object("set-font")?;
                    match (object, resolved.get(index)) {
                        (Resource::Font(font), Some(Ok(NativeResource::Css(css)))) => target.set_css_font(font, css),
                        (Resource::Font(font), _) => target.set_font(font),
                        _ => log::warn!("set-font operand is not a font"),
                    }
                }
                Op::SetTransform => target.set_transform(&cur.transform("set-transform")?),
                Op::Transform => target.transform(&cur.transform("transform")?),
                Op::SetOpacity => {
                    let [opacity] = cur.numbers::<1>("set-opacity")?;
                    target.set_opacity(opacity);
                }
                Op::SetComposite => {
                    let name = cur.string("set-composite")?;
                    match Composite::from_css(name) {
                        Some(composite) => target.set_composite(composite),
                        None => log::warn!("unknown composite {name} skipped"),
                    }
                }
                Op::SetImageQuality => {
                    let [quality] = cur.numbers::<1>("set-image-quality")?;
                    target.set_image_quality(quality);
                }
                Op::Save => target.save(),
                Op::Restore => target.restore()?,
            }
        }
        Ok(())
    }

    fn push_numbers(&mut self, op: Op, numbers: &[f64]) {
        self.ops.push(op);
        self.numbers.extend_from_slice(numbers);
    }

    fn push_rect(&mut self, op: Op, rect: &Rect) {
        self.push_numbers(op, &[rect.x, rect.y, rect.width, rect.height]);
    }

    fn push_object(&mut self, op: Op, object: Resource) {
        self.ops.push(op);
        self.objects.push(object);
    }

    fn push_path(&mut self, shape: &Shape) {
        for seg in shape.segments() {
            match seg {
                PathSeg::MoveTo(p) => self.push_numbers(Op::MoveTo, &[p.x, p.y]),
                PathSeg::LineTo(p) => self.push_numbers(Op::LineTo, &[p.x, p.y]),
                PathSeg::CubicTo(c1, c2, p) => self.push_numbers(Op::CubicTo, &[c1.x, c1.y, c2.x, c2.y, p.x, p.y]),
                PathSeg::Close => self.ops.push(Op::ClosePath),
            }
        }
    }
}

impl Painter for DeferredPainter {
    fn set_paint(&mut self, paint: &Paint) {
        self.push_object(Op::SetPaint, Resource::Paint(paint.clone()));
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        self.push_object(Op::SetStroke, Resource::Stroke(stroke.clone()));
    }

    fn set_font(&mut self, font: &Font) {
        self.push_object(Op::SetFont, Resource::Font(font.clone()));
    }

    fn set_transform(&mut self, transform: &Transform) {
        self.push_numbers(Op::SetTransform, &transform.matrix());
    }

    fn transform(&mut self, transform: &Transform) {
        self.push_numbers(Op::Transform, &transform.matrix());
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.push_numbers(Op::SetOpacity, &[opacity]);
    }

    fn set_composite(&mut self, composite: Composite) {
        self.ops.push(Op::SetComposite);
        self.strings.push(composite.css().to_owned());
    }

    fn set_image_quality(&mut self, quality: f64) {
        self.push_numbers(Op::SetImageQuality, &[quality]);
    }

    fn fill(&mut self, shape: &Shape) {
        match shape {
            Shape::Rect(rect) => self.push_rect(Op::FillRect, rect),
            Shape::Path(_) => {
                self.push_path(shape);
                self.ops.push(Op::FillPath);
            }
        }
    }

    fn draw(&mut self, shape: &Shape) {
        match shape {
            Shape::Rect(rect) => self.push_rect(Op::StrokeRect, rect),
            Shape::Path(_) => {
                self.push_path(shape);
                self.ops.push(Op::StrokePath);
            }
        }
    }

    fn clip(&mut self, shape: &Shape) {
        self.push_path(shape);
        self.ops.push(Op::ClipPath);
    }

    fn draw_image(&mut self, image: &Image, src: Rect, dst: Rect) {
        self.push_object(Op::DrawImage, Resource::Image(image.clone()));
        self.numbers.extend_from_slice(&[src.x, src.y, src.width, src.height]);
        self.numbers.extend_from_slice(&[dst.x, dst.y, dst.width, dst.height]);
    }

    fn draw_string(&mut self, text: &str, x: f64, y: f64, char_spacing: f64) {
        self.strings.push(text.to_owned());
        self.push_numbers(Op::DrawString, &[x, y, char_spacing]);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.push_rect(Op::ClearRect, &rect);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) -> Result<(), PaintError> {
        if self.depth == 0 {
            log::error!("deferred restore without matching save");
            return Err(PaintError::UnbalancedRestore);
        }
        self.depth -= 1;
        self.ops.push(Op::Restore);
        Ok(())
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

/// Read cursors into the three operand pools.
struct Operands<'a> {
    painter: &'a DeferredPainter,
    number: usize,
    string: usize,
    object: usize,
}

impl<'a> Operands<'a> {
    fn new(painter: &'a DeferredPainter) -> Self {
        Self { painter, number: 0, string: 0, object: 0 }
    }

    fn numbers<const N: usize>(&mut self, op: &'static str) -> Result<[f64; N], PaintError> {
        let slice = self
            .painter
            .numbers
            .get(self.number..self.number + N)
            .ok_or(PaintError::MalformedBatch(op))?;
        let mut out = [0.0; N];
        out.copy_from_slice(slice);
        self.number += N;
        Ok(out)
    }

    fn rect(&mut self, op: &'static str) -> Result<Rect, PaintError> {
        let [x, y, w, h] = self.numbers::<4>(op)?;
        Ok(Rect::new(x, y, w, h))
    }

    fn transform(&mut self, op: &'static str) -> Result<Transform, PaintError> {
        let [a, b, c, d, e, f] = self.numbers::<6>(op)?;
        Ok(Transform::new(a, b, c, d, e, f))
    }

    fn string(&mut self, op: &'static str) -> Result<&'a str, PaintError> {
        let s = self.painter.strings.get(self.string).ok_or(PaintError::MalformedBatch(op))?;
        self.string += 1;
        Ok(s)
    }

    fn object(&mut self, op: &'static str) -> Result<(usize, &'a Resource), PaintError> {
        let index = self.object;
        let object = self.painter.objects.get(index).ok_or(PaintError::MalformedBatch(op))?;
        self.object += 1;
        Ok((index, object))
    }
}
