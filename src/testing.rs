//! Recording doubles for the DOM seams, shared by the unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{PaintError, ScreenError};
use crate::geom::{Point, Rect, Size, Transform};
use crate::input::InputEvent;
use crate::paint::{
    Composite, Context2d, ImageHandle, LineCap, LineJoin, NativeStyle, Painter, SmoothingQuality,
};
use crate::schedule::Scheduler;
use crate::surface::{Parent, SurfaceHost};
use crate::view::{View, ViewRequest};

/// Advance width the recording context reports for every character.
pub const GLYPH_WIDTH: f64 = 10.0;

// =============================================================
// Context
// =============================================================

#[derive(Debug, Default)]
struct ContextLog {
    calls: Vec<String>,
    depth: usize,
    underflow: bool,
}

/// A [`Context2d`] that records every call as a canvas-like string.
///
/// Clones share one log, so a test can keep a clone after handing the
/// context to a painter.
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    log: Rc<RefCell<ContextLog>>,
    fail_images: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose image calls fail.
    pub fn failing_images() -> Self {
        Self { fail_images: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().calls.clear();
    }

    pub fn depth(&self) -> usize {
        self.log.borrow().depth
    }

    /// Whether a `restore` ever ran with no open `save`.
    pub fn underflowed(&self) -> bool {
        self.log.borrow().underflow
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.log.borrow().calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn push(&self, call: String) {
        self.log.borrow_mut().calls.push(call);
    }
}

pub fn handle_name(handle: &ImageHandle) -> String {
    handle.downcast_ref::<String>().cloned().unwrap_or_else(|| "?".to_owned())
}

fn style_name(style: &NativeStyle) -> String {
    match style {
        NativeStyle::Css(css) => css.clone(),
        NativeStyle::LinearGradient { start, end, stops } => {
            format!("gradient({},{},{},{};{})", start.x, start.y, end.x, end.y, stops.len())
        }
        NativeStyle::Pattern(handle) => format!("pattern({})", handle_name(handle)),
    }
}

fn matrix(t: &Transform) -> String {
    format!("{},{},{},{},{},{}", t.a, t.b, t.c, t.d, t.e, t.f)
}

fn rect(r: &Rect) -> String {
    format!("{},{},{},{}", r.x, r.y, r.width, r.height)
}

impl Context2d for RecordingContext {
    fn save(&mut self) {
        self.log.borrow_mut().depth += 1;
        self.push("save".to_owned());
    }

    fn restore(&mut self) {
        {
            let mut log = self.log.borrow_mut();
            if log.depth == 0 {
                log.underflow = true;
            } else {
                log.depth -= 1;
            }
        }
        self.push("restore".to_owned());
    }

    fn set_transform(&mut self, transform: &Transform) -> Result<(), PaintError> {
        self.push(format!("setTransform({})", matrix(transform)));
        Ok(())
    }

    fn transform(&mut self, transform: &Transform) -> Result<(), PaintError> {
        self.push(format!("transform({})", matrix(transform)));
        Ok(())
    }

    fn set_fill_style(&mut self, style: &NativeStyle) -> Result<(), PaintError> {
        self.push(format!("fillStyle={}", style_name(style)));
        Ok(())
    }

    fn set_stroke_style(&mut self, style: &NativeStyle) -> Result<(), PaintError> {
        self.push(format!("strokeStyle={}", style_name(style)));
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(format!("lineWidth={width}"));
    }

    fn set_line_dash(&mut self, dash: &[f64]) -> Result<(), PaintError> {
        let parts: Vec<String> = dash.iter().map(ToString::to_string).collect();
        self.push(format!("lineDash=[{}]", parts.join(",")));
        Ok(())
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.push(format!("lineDashOffset={offset}"));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(format!("lineCap={}", cap.css()));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.push(format!("lineJoin={}", join.css()));
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.push(format!("miterLimit={limit}"));
    }

    fn set_font(&mut self, css: &str) {
        self.push(format!("font={css}"));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(format!("globalAlpha={alpha}"));
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), PaintError> {
        self.push(format!("composite={}", composite.css()));
        Ok(())
    }

    fn set_image_smoothing(&mut self, quality: Option<SmoothingQuality>) {
        match quality {
            Some(q) => self.push(format!("smoothing={}", q.css())),
            None => self.push("smoothing=off".to_owned()),
        }
    }

    fn begin_path(&mut self) {
        self.push("beginPath".to_owned());
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(format!("moveTo({x},{y})"));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(format!("lineTo({x},{y})"));
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.push(format!("bezierCurveTo({},{},{},{},{},{})", c1.x, c1.y, c2.x, c2.y, end.x, end.y));
    }

    fn close_path(&mut self) {
        self.push("closePath".to_owned());
    }

    fn fill(&mut self) {
        self.push("fill".to_owned());
    }

    fn stroke(&mut self) {
        self.push("stroke".to_owned());
    }

    fn clip(&mut self) {
        self.push("clip".to_owned());
    }

    fn fill_rect(&mut self, r: &Rect) {
        self.push(format!("fillRect({})", rect(r)));
    }

    fn stroke_rect(&mut self, r: &Rect) {
        self.push(format!("strokeRect({})", rect(r)));
    }

    fn clear_rect(&mut self, r: &Rect) {
        self.push(format!("clearRect({})", rect(r)));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), PaintError> {
        self.push(format!("fillText({text},{x},{y})"));
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&mut self, text: &str) -> Result<f64, PaintError> {
        Ok(text.chars().count() as f64 * GLYPH_WIDTH)
    }

    fn draw_image(&mut self, image: &ImageHandle, src: &Rect, dst: &Rect) -> Result<(), PaintError> {
        if self.fail_images {
            return Err(PaintError::Context("image not drawable".to_owned()));
        }
        self.push(format!("drawImage({},{},{})", handle_name(image), rect(src), rect(dst)));
        Ok(())
    }

    fn resample_image(&mut self, image: &ImageHandle, width: u32, height: u32) -> Result<ImageHandle, PaintError> {
        if self.fail_images {
            return Err(PaintError::Context("image not drawable".to_owned()));
        }
        let name = handle_name(image);
        self.push(format!("resample({name},{width},{height})"));
        Ok(ImageHandle::new(format!("{name}@{width}x{height}")))
    }
}

// =============================================================
// Surface host
// =============================================================

/// Everything a [`RecordingHost`] has been told to do.
#[derive(Debug, Default)]
pub struct HostLog {
    pub attached: Option<Parent>,
    pub attach_count: usize,
    pub detach_count: usize,
    pub chrome: HashMap<String, String>,
    pub canvas: HashMap<String, String>,
    pub body: HashMap<String, String>,
    pub css_size: Size,
    pub backing: (u32, u32),
    pub blits: Vec<Rect>,
    pub containers: HashMap<String, Rect>,
    pub viewport: Size,
}

/// A [`SurfaceHost`] that records DOM mutations. Clones share one log.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub log: Rc<RefCell<HostLog>>,
    pub context: RecordingContext,
}

impl RecordingHost {
    pub fn new() -> Self {
        let log = HostLog { viewport: Size::new(1024.0, 768.0), ..HostLog::default() };
        Self { log: Rc::new(RefCell::new(log)), context: RecordingContext::new() }
    }

    /// Add a container element with the given page bounds.
    pub fn with_container(self, name: &str, bounds: Rect) -> Self {
        self.log.borrow_mut().containers.insert(name.to_owned(), bounds);
        self
    }

    pub fn set_viewport(&self, size: Size) {
        self.log.borrow_mut().viewport = size;
    }

    pub fn chrome(&self, property: &str) -> Option<String> {
        self.log.borrow().chrome.get(property).cloned()
    }

    pub fn canvas(&self, property: &str) -> Option<String> {
        self.log.borrow().canvas.get(property).cloned()
    }

    pub fn body(&self, property: &str) -> Option<String> {
        self.log.borrow().body.get(property).cloned()
    }
}

impl SurfaceHost for RecordingHost {
    type Context = RecordingContext;

    fn buffer_context(&mut self) -> Result<RecordingContext, ScreenError> {
        Ok(self.context.clone())
    }

    fn attach(&mut self, parent: &Parent) -> Result<(), ScreenError> {
        let mut log = self.log.borrow_mut();
        if let Parent::Container(name) = parent {
            if !log.containers.contains_key(name) {
                return Err(ScreenError::Dom(format!("no element {name}")));
            }
        }
        log.attached = Some(parent.clone());
        log.attach_count += 1;
        Ok(())
    }

    fn detach(&mut self) {
        let mut log = self.log.borrow_mut();
        log.attached = None;
        log.detach_count += 1;
    }

    fn container_bounds(&self, name: &str) -> Option<Rect> {
        self.log.borrow().containers.get(name).copied()
    }

    fn viewport(&self) -> Size {
        self.log.borrow().viewport
    }

    fn set_chrome_style(&mut self, property: &str, value: &str) {
        self.log.borrow_mut().chrome.insert(property.to_owned(), value.to_owned());
    }

    fn set_canvas_style(&mut self, property: &str, value: &str) {
        self.log.borrow_mut().canvas.insert(property.to_owned(), value.to_owned());
    }

    fn set_body_style(&mut self, property: &str, value: &str) -> Option<String> {
        let prev = self.log.borrow_mut().body.insert(property.to_owned(), value.to_owned());
        Some(prev.unwrap_or_default())
    }

    fn size_canvases(&mut self, css: Size, backing_width: u32, backing_height: u32) {
        let mut log = self.log.borrow_mut();
        log.css_size = css;
        log.backing = (backing_width, backing_height);
    }

    fn blit(&mut self, pixels: &Rect) {
        self.log.borrow_mut().blits.push(*pixels);
    }
}

// =============================================================
// View
// =============================================================

#[derive(Debug, Default)]
pub struct ViewLog {
    pub events: Vec<InputEvent>,
    pub painted: Vec<Rect>,
    pub focus: Vec<bool>,
    pub closed: usize,
}

/// A [`View`] that records what it receives and answers every event with
/// the queued requests. It fills the painted region with one rect.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub log: Rc<RefCell<ViewLog>>,
    pub replies: Rc<RefCell<Vec<ViewRequest>>>,
    /// Extra `save` calls to leave open on every paint.
    pub leak_saves: usize,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next event with `requests`.
    pub fn reply(&self, requests: Vec<ViewRequest>) {
        *self.replies.borrow_mut() = requests;
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.log.borrow().events.clone()
    }

    pub fn painted(&self) -> Vec<Rect> {
        self.log.borrow().painted.clone()
    }
}

impl View for RecordingView {
    fn handle_event(&mut self, event: &InputEvent) -> Vec<ViewRequest> {
        self.log.borrow_mut().events.push(event.clone());
        std::mem::take(&mut *self.replies.borrow_mut())
    }

    fn paint(&mut self, painter: &mut dyn Painter, region: Rect) {
        self.log.borrow_mut().painted.push(region);
        painter.fill(&region.into());
        for _ in 0..self.leak_saves {
            painter.save();
        }
    }

    fn focus_changed(&mut self, focused: bool) {
        self.log.borrow_mut().focus.push(focused);
    }

    fn window_closed(&mut self) {
        self.log.borrow_mut().closed += 1;
    }
}

// =============================================================
// Scheduler
// =============================================================

type Callback = Box<dyn FnMut()>;

struct Timer {
    id: u64,
    due_ms: f64,
    period_ms: Option<f64>,
    callback: Callback,
}

#[derive(Default)]
struct Clock {
    now_ms: f64,
    next_id: u64,
    timers: Vec<Timer>,
    cancelled: Vec<u64>,
}

/// A [`Scheduler`] driven by hand: timers fire only inside [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<Clock>>,
}

/// Cancels its timer when dropped.
pub struct ManualHandle {
    id: u64,
    clock: Rc<RefCell<Clock>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        let removed: Vec<Timer> = {
            let Ok(mut clock) = self.clock.try_borrow_mut() else {
                return;
            };
            clock.cancelled.push(self.id);
            let (removed, kept) = std::mem::take(&mut clock.timers).into_iter().partition(|t| t.id == self.id);
            clock.timers = kept;
            removed
        };
        // Callbacks may own other handles; drop them with the clock released.
        drop(removed);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    fn add(&self, delay_ms: u32, period_ms: Option<u32>, callback: Callback) -> ManualHandle {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = clock.next_id;
        let due_ms = clock.now_ms + f64::from(delay_ms);
        clock.timers.push(Timer { id, due_ms, period_ms: period_ms.map(f64::from), callback });
        ManualHandle { id, clock: Rc::clone(&self.clock) }
    }

    /// Move time forward, firing every timer that comes due, in due order.
    pub fn advance(&self, ms: f64) {
        let target = self.clock.borrow().now_ms + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
                    .map(|(i, _)| i);
                due.map(|i| {
                    let timer = clock.timers.remove(i);
                    clock.now_ms = clock.now_ms.max(timer.due_ms);
                    timer
                })
            };
            let Some(mut timer) = next else {
                break;
            };
            (timer.callback)();
            if let Some(period) = timer.period_ms {
                let mut clock = self.clock.borrow_mut();
                if !clock.cancelled.contains(&timer.id) {
                    timer.due_ms += period.max(1.0);
                    clock.timers.push(timer);
                }
            }
        }
        self.clock.borrow_mut().now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> ManualHandle {
        let mut once = Some(callback);
        self.add(
            delay_ms,
            None,
            Box::new(move || {
                if let Some(cb) = once.take() {
                    cb();
                }
            }),
        )
    }

    fn interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> ManualHandle {
        self.add(period_ms, Some(period_ms), callback)
    }
}
