#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;
use crate::paint::style::{Color, GradientStop, LinearGradient};
use crate::shape::Path;
use crate::testing::RecordingContext;

fn painter(scale: f64) -> (ImmediatePainter<RecordingContext>, RecordingContext) {
    let ctx = RecordingContext::new();
    let painter = ImmediatePainter::new(ctx.clone(), scale);
    ctx.clear();
    (painter, ctx)
}

fn triangle() -> Shape {
    let mut path = Path::new();
    path.move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(5.0, 8.0).close();
    Shape::Path(path)
}

fn image(name: &str) -> Image {
    Image::new(ImageHandle::new(name.to_owned()), 40, 20)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_pushes_full_state_to_context() {
    let ctx = RecordingContext::new();
    let _painter = ImmediatePainter::new(ctx.clone(), 2.0);
    let calls = ctx.calls();
    assert_eq!(calls[0], "setTransform(2,0,0,2,0,0)");
    for expected in [
        "fillStyle=rgb(0,0,0)",
        "strokeStyle=rgb(0,0,0)",
        "lineWidth=1",
        "lineDash=[]",
        "miterLimit=10",
        "font=12px Arial",
        "globalAlpha=1",
        "composite=source-over",
        "smoothing=medium",
    ] {
        assert!(calls.iter().any(|c| c == expected), "missing {expected} in {calls:?}");
    }
}

// =============================================================
// State setters
// =============================================================

#[test]
fn unchanged_state_is_not_resent() {
    let (mut p, ctx) = painter(1.0);
    p.set_paint(&Paint::Color(Color::BLACK));
    p.set_stroke(&Stroke::default());
    p.set_font(&Font::default());
    p.set_opacity(1.0 + 1e-7);
    p.set_composite(Composite::SrcOver);
    p.set_image_quality(0.5);
    p.set_transform(&Transform::IDENTITY);
    p.transform(&Transform::IDENTITY);
    assert!(ctx.calls().is_empty(), "{:?}", ctx.calls());
}

#[test]
fn color_paint_sets_fill_and_stroke() {
    let (mut p, ctx) = painter(1.0);
    p.set_paint(&Color::rgb(255, 0, 0).into());
    assert_eq!(ctx.calls(), vec!["fillStyle=rgb(255,0,0)", "strokeStyle=rgb(255,0,0)"]);
}

#[test]
fn opacity_change_beyond_epsilon_is_sent() {
    let (mut p, ctx) = painter(1.0);
    p.set_opacity(0.5);
    assert_eq!(ctx.calls(), vec!["globalAlpha=0.5"]);
    assert_eq!(p.state().opacity, 0.5);
}

#[test]
fn image_quality_picks_smoothing_level() {
    assert_eq!(smoothing_for(1.0), Some(SmoothingQuality::High));
    assert_eq!(smoothing_for(0.5), Some(SmoothingQuality::Medium));
    assert_eq!(smoothing_for(0.33), None);
    assert_eq!(smoothing_for(0.0), None);

    let (mut p, ctx) = painter(1.0);
    p.set_image_quality(0.9);
    p.set_image_quality(0.1);
    assert_eq!(ctx.calls(), vec!["smoothing=high", "smoothing=off"]);
}

#[test]
fn stroke_sends_every_property() {
    let (mut p, ctx) = painter(1.0);
    let stroke = Stroke { dash: vec![4.0, 2.0], dash_offset: 1.0, ..Stroke::solid(3.0) };
    p.set_stroke(&stroke);
    assert_eq!(
        ctx.calls(),
        vec![
            "lineWidth=3",
            "lineDash=[4,2]",
            "lineDashOffset=1",
            "lineCap=butt",
            "lineJoin=miter",
            "miterLimit=10"
        ]
    );
}

// =============================================================
// Transforms and device scale
// =============================================================

#[test]
fn set_transform_folds_in_device_scale() {
    let (mut p, ctx) = painter(2.0);
    p.set_transform(&Transform::translate(10.0, 5.0));
    assert_eq!(ctx.calls(), vec!["setTransform(2,0,0,2,20,10)"]);
    assert_eq!(p.state().transform, Transform::translate(10.0, 5.0));
}

#[test]
fn transform_concatenates_onto_state() {
    let (mut p, ctx) = painter(2.0);
    p.transform(&Transform::translate(1.0, 2.0));
    p.transform(&Transform::scale(3.0, 3.0));
    assert_eq!(ctx.calls(), vec!["transform(1,0,0,1,1,2)", "transform(3,0,0,3,0,0)"]);
    assert_eq!(p.state().transform, Transform::new(3.0, 0.0, 0.0, 3.0, 1.0, 2.0));
}

#[test]
fn set_scale_resends_transform() {
    let (mut p, ctx) = painter(1.0);
    p.set_scale(3.0);
    assert_eq!(ctx.calls(), vec!["setTransform(3,0,0,3,0,0)"]);
    assert_eq!(p.scale(), 3.0);
}

// =============================================================
// Shapes
// =============================================================

#[test]
fn rects_use_the_fast_path() {
    let (mut p, ctx) = painter(1.0);
    p.fill(&Rect::new(1.0, 2.0, 3.0, 4.0).into());
    p.draw(&Rect::new(1.0, 2.0, 3.0, 4.0).into());
    assert_eq!(ctx.calls(), vec!["fillRect(1,2,3,4)", "strokeRect(1,2,3,4)"]);
}

#[test]
fn paths_are_traced_then_filled() {
    let (mut p, ctx) = painter(1.0);
    p.fill(&triangle());
    assert_eq!(
        ctx.calls(),
        vec!["beginPath", "moveTo(0,0)", "lineTo(10,0)", "lineTo(5,8)", "closePath", "fill"]
    );
}

#[test]
fn clip_traces_rects_as_paths() {
    let (mut p, ctx) = painter(1.0);
    p.clip(&Rect::new(0.0, 0.0, 5.0, 5.0).into());
    let calls = ctx.calls();
    assert_eq!(calls.first().map(String::as_str), Some("beginPath"));
    assert_eq!(calls.last().map(String::as_str), Some("clip"));
    assert_eq!(ctx.count("lineTo"), 3);
}

#[test]
fn ellipse_uses_four_curves() {
    let (mut p, ctx) = painter(1.0);
    p.draw(&Shape::ellipse(Rect::new(0.0, 0.0, 20.0, 10.0)));
    assert_eq!(ctx.count("bezierCurveTo"), 4);
    assert_eq!(ctx.count("stroke"), 1);
}

#[test]
fn gradient_is_built_against_shape_bounds() {
    let (mut p, ctx) = painter(1.0);
    let stops = vec![
        GradientStop { offset: 0.0, color: Color::BLACK },
        GradientStop { offset: 1.0, color: Color::WHITE },
    ];
    p.set_paint(&Paint::Gradient(LinearGradient::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0), stops)));
    assert!(ctx.calls().is_empty());

    p.fill(&Rect::new(10.0, 10.0, 50.0, 20.0).into());
    p.draw(&Rect::new(0.0, 0.0, 5.0, 5.0).into());
    assert_eq!(
        ctx.calls(),
        vec![
            "fillStyle=gradient(10,10,60,10;2)",
            "fillRect(10,10,50,20)",
            "strokeStyle=gradient(0,0,5,0;2)",
            "strokeRect(0,0,5,5)"
        ]
    );
}

#[test]
fn pattern_uses_image_directly_at_normal_density() {
    let (mut p, ctx) = painter(1.0);
    p.set_paint(&Paint::Pattern(image("tile")));
    p.fill(&Rect::new(0.0, 0.0, 10.0, 10.0).into());
    assert_eq!(ctx.calls(), vec!["fillStyle=pattern(tile)", "fillRect(0,0,10,10)"]);
}

#[test]
fn hidpi_pattern_is_resampled_to_logical_size() {
    let (mut p, ctx) = painter(2.0);
    p.set_paint(&Paint::Pattern(Image::hidpi(ImageHandle::new("tile".to_owned()), 64, 32, 2.0)));
    p.fill(&Rect::new(0.0, 0.0, 10.0, 10.0).into());
    assert_eq!(
        ctx.calls(),
        vec!["resample(tile,32,16)", "fillStyle=pattern(tile@32x16)", "fillRect(0,0,10,10)"]
    );
}

#[test]
fn unloaded_pattern_skips_the_shape() {
    let (mut p, ctx) = painter(1.0);
    p.set_paint(&Paint::Pattern(Image::pending(8.0, 8.0)));
    p.fill(&triangle());
    assert!(ctx.calls().is_empty());
}

#[test]
fn failed_resample_skips_the_shape() {
    let ctx = RecordingContext::failing_images();
    let mut p = ImmediatePainter::new(ctx.clone(), 2.0);
    ctx.clear();
    p.set_paint(&Paint::Pattern(Image::hidpi(ImageHandle::new("tile".to_owned()), 64, 32, 2.0)));
    p.fill(&Rect::new(0.0, 0.0, 10.0, 10.0).into());
    assert_eq!(ctx.count("fillRect"), 0);
}

// =============================================================
// Images and text
// =============================================================

#[test]
fn image_source_is_scaled_to_pixels() {
    let (mut p, ctx) = painter(2.0);
    let img = Image::hidpi(ImageHandle::new("icon".to_owned()), 80, 40, 2.0);
    p.draw_image(&img, Rect::new(10.0, 0.0, 20.0, 20.0), Rect::new(0.0, 0.0, 20.0, 20.0));
    assert_eq!(ctx.calls(), vec!["drawImage(icon,20,0,40,40,0,0,20,20)"]);
}

#[test]
fn draw_image_at_uses_logical_size() {
    let (mut p, ctx) = painter(1.0);
    p.draw_image_at(&image("icon"), 5.0, 6.0);
    assert_eq!(ctx.calls(), vec!["drawImage(icon,0,0,40,20,5,6,40,20)"]);
}

#[test]
fn unloaded_image_is_skipped() {
    let (mut p, ctx) = painter(1.0);
    p.draw_image_at(&Image::pending(10.0, 10.0), 0.0, 0.0);
    assert!(ctx.calls().is_empty());
}

#[test]
fn plain_text_is_one_call() {
    let (mut p, ctx) = painter(1.0);
    p.draw_string("hello", 3.0, 12.0, 0.0);
    assert_eq!(ctx.calls(), vec!["fillText(hello,3,12)"]);
}

#[test]
fn spaced_text_advances_per_glyph() {
    let (mut p, ctx) = painter(1.0);
    p.draw_string("ab", 0.0, 10.0, 2.5);
    assert_eq!(ctx.calls(), vec!["fillText(a,0,10)", "fillText(b,12.5,10)"]);
}

// =============================================================
// Save / restore
// =============================================================

#[test]
fn restore_brings_back_saved_state() {
    let (mut p, ctx) = painter(1.0);
    p.save();
    p.set_opacity(0.25);
    p.set_font(&Font::new("Courier", 10.0));
    p.restore().unwrap();
    assert_eq!(p.state().opacity, 1.0);
    assert_eq!(p.state().font, Font::default());
    assert_eq!(p.depth(), 0);
    assert_eq!(ctx.depth(), 0);

    // Back at the saved value, so setting it again is a no-op.
    ctx.clear();
    p.set_opacity(1.0);
    assert!(ctx.calls().is_empty());
}

#[test]
fn restore_without_save_is_rejected() {
    let (mut p, ctx) = painter(1.0);
    assert_eq!(p.restore(), Err(PaintError::UnbalancedRestore));
    assert!(!ctx.underflowed());
    assert!(ctx.calls().is_empty());
}

#[test]
fn saves_pair_with_context_saves() {
    let (mut p, ctx) = painter(1.0);
    p.save();
    p.save();
    assert_eq!(p.depth(), 2);
    assert_eq!(ctx.depth(), 2);
    p.restore().unwrap();
    assert_eq!(ctx.depth(), 1);
}
