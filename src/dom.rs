//! Browser backends: the `web_sys` side of every seam.
//!
//! Nothing in here is unit tested; it is a thin translation layer. The logic
//! it feeds ([`crate::engine::ScreenCore`], the painters, the router) is
//! tested against recording doubles instead.
//!
//! ```text
//! document listeners ──► native_event ──► Screen::handle_native
//!                                                 │
//!                     CanvasContext ◄── painters ◄┘
//! ```

use std::rc::Rc;

use js_sys::Date;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CanvasGradient, CanvasPattern, CanvasRenderingContext2d, Document, Element, Event, EventTarget,
    HtmlCanvasElement, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent, PointerEvent, TouchEvent, TouchList, WheelEvent,
};

use gloo_timers::callback::{Interval, Timeout};

use crate::capability::DeviceCapabilities;
use crate::config::ScreenConfig;
use crate::engine::{HostAction, Screen};
use crate::error::{PaintError, ScreenError};
use crate::geom::{Point, Rect, Size, Transform};
use crate::input::{Button, Modifiers, WheelDelta};
use crate::normalize::{KeyPhase, NativeEvent, PointerPhase, PointerSample, TouchPhase};
use crate::paint::context::{Context2d, NativeStyle};
use crate::paint::style::{Composite, GradientStop, ImageHandle, LineCap, LineJoin, SmoothingQuality};
use crate::schedule::Scheduler;
use crate::surface::{Parent, SurfaceHost};
use crate::view::View;
use crate::window::{Window, WindowId};

fn paint_err(e: &JsValue) -> PaintError {
    PaintError::Context(format!("{e:?}"))
}

fn dom_err(e: &JsValue) -> ScreenError {
    ScreenError::Dom(format!("{e:?}"))
}

fn document() -> Result<Document, ScreenError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ScreenError::Dom("no document".to_owned()))
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, ScreenError> {
    document
        .create_element("canvas")
        .map_err(|e| dom_err(&e))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ScreenError::Dom("created element is not a canvas".to_owned()))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ScreenError> {
    canvas
        .get_context("2d")
        .map_err(|e| dom_err(&e))?
        .ok_or(ScreenError::MissingContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ScreenError::MissingContext)
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        log::warn!("style {property}={value} rejected: {e:?}");
    }
}

// =============================================================
// Canvas context
// =============================================================

/// [`Context2d`] over a browser `CanvasRenderingContext2D`.
#[derive(Clone)]
pub struct CanvasContext {
    ctx: CanvasRenderingContext2d,
    document: Document,
}

impl CanvasContext {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d, document: Document) -> Self {
        Self { ctx, document }
    }

    fn canvas_style(&self, style: &NativeStyle) -> Result<CanvasStyle, PaintError> {
        match style {
            NativeStyle::Css(css) => Ok(CanvasStyle::Css(css.clone())),
            NativeStyle::LinearGradient { start, end, stops } => {
                let gradient = self.ctx.create_linear_gradient(start.x, start.y, end.x, end.y);
                for GradientStop { offset, color } in stops {
                    #[allow(clippy::cast_possible_truncation)]
                    gradient.add_color_stop(*offset as f32, &color.css()).map_err(|e| paint_err(&e))?;
                }
                Ok(CanvasStyle::Gradient(gradient))
            }
            NativeStyle::Pattern(handle) => {
                let pattern = if let Some(img) = handle.downcast_ref::<HtmlImageElement>() {
                    self.ctx.create_pattern_with_html_image_element(img, "repeat")
                } else if let Some(canvas) = handle.downcast_ref::<HtmlCanvasElement>() {
                    self.ctx.create_pattern_with_html_canvas_element(canvas, "repeat")
                } else {
                    return Err(PaintError::Context("pattern source is not drawable".to_owned()));
                };
                pattern
                    .map_err(|e| paint_err(&e))?
                    .map(CanvasStyle::Pattern)
                    .ok_or_else(|| PaintError::Context("pattern source not ready".to_owned()))
            }
        }
    }
}

enum CanvasStyle {
    Css(String),
    Gradient(CanvasGradient),
    Pattern(CanvasPattern),
}

impl Context2d for CanvasContext {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, t: &Transform) -> Result<(), PaintError> {
        self.ctx.set_transform(t.a, t.b, t.c, t.d, t.e, t.f).map_err(|e| paint_err(&e))
    }

    fn transform(&mut self, t: &Transform) -> Result<(), PaintError> {
        self.ctx.transform(t.a, t.b, t.c, t.d, t.e, t.f).map_err(|e| paint_err(&e))
    }

    fn set_fill_style(&mut self, style: &NativeStyle) -> Result<(), PaintError> {
        match self.canvas_style(style)? {
            CanvasStyle::Css(css) => self.ctx.set_fill_style_str(&css),
            CanvasStyle::Gradient(g) => self.ctx.set_fill_style_canvas_gradient(&g),
            CanvasStyle::Pattern(p) => self.ctx.set_fill_style_canvas_pattern(&p),
        }
        Ok(())
    }

    fn set_stroke_style(&mut self, style: &NativeStyle) -> Result<(), PaintError> {
        match self.canvas_style(style)? {
            CanvasStyle::Css(css) => self.ctx.set_stroke_style_str(&css),
            CanvasStyle::Gradient(g) => self.ctx.set_stroke_style_canvas_gradient(&g),
            CanvasStyle::Pattern(p) => self.ctx.set_stroke_style_canvas_pattern(&p),
        }
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, dash: &[f64]) -> Result<(), PaintError> {
        let array = js_sys::Array::new();
        for v in dash {
            array.push(&JsValue::from_f64(*v));
        }
        self.ctx.set_line_dash(&array).map_err(|e| paint_err(&e))
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.ctx.set_line_dash_offset(offset);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.css());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.css());
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.ctx.set_miter_limit(limit);
    }

    fn set_font(&mut self, css: &str) {
        self.ctx.set_font(css);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_composite(&mut self, composite: Composite) -> Result<(), PaintError> {
        self.ctx.set_global_composite_operation(composite.css()).map_err(|e| paint_err(&e))
    }

    fn set_image_smoothing(&mut self, quality: Option<SmoothingQuality>) {
        self.ctx.set_image_smoothing_enabled(quality.is_some());
        if let Some(q) = quality {
            // `imageSmoothingQuality` is not in every engine; set it reflectively.
            let key = JsValue::from_str("imageSmoothingQuality");
            if let Err(e) = js_sys::Reflect::set(&self.ctx, &key, &JsValue::from_str(q.css())) {
                log::debug!("imageSmoothingQuality unsupported: {e:?}");
            }
        }
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill_rect(&mut self, r: &Rect) {
        self.ctx.fill_rect(r.x, r.y, r.width, r.height);
    }

    fn stroke_rect(&mut self, r: &Rect) {
        self.ctx.stroke_rect(r.x, r.y, r.width, r.height);
    }

    fn clear_rect(&mut self, r: &Rect) {
        self.ctx.clear_rect(r.x, r.y, r.width, r.height);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), PaintError> {
        self.ctx.fill_text(text, x, y).map_err(|e| paint_err(&e))
    }

    fn measure_text(&mut self, text: &str) -> Result<f64, PaintError> {
        match self.ctx.measure_text(text) {
            Ok(metrics) => Ok(metrics.width()),
            Err(e) => Err(paint_err(&e)),
        }
    }

    fn draw_image(&mut self, image: &ImageHandle, src: &Rect, dst: &Rect) -> Result<(), PaintError> {
        let result = if let Some(img) = image.downcast_ref::<HtmlImageElement>() {
            self.ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                img, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )
        } else if let Some(canvas) = image.downcast_ref::<HtmlCanvasElement>() {
            self.ctx.draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                canvas, src.x, src.y, src.width, src.height, dst.x, dst.y, dst.width, dst.height,
            )
        } else {
            return Err(PaintError::Context("image handle is not drawable".to_owned()));
        };
        result.map_err(|e| paint_err(&e))
    }

    fn resample_image(&mut self, image: &ImageHandle, width: u32, height: u32) -> Result<ImageHandle, PaintError> {
        let scratch = create_canvas(&self.document).map_err(|e| PaintError::Context(e.to_string()))?;
        scratch.set_width(width.max(1));
        scratch.set_height(height.max(1));
        let ctx = context_2d(&scratch).map_err(|e| PaintError::Context(e.to_string()))?;
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        let result = if let Some(img) = image.downcast_ref::<HtmlImageElement>() {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)
        } else if let Some(canvas) = image.downcast_ref::<HtmlCanvasElement>() {
            ctx.draw_image_with_html_canvas_element_and_dw_and_dh(canvas, 0.0, 0.0, w, h)
        } else {
            return Err(PaintError::Context("image handle is not drawable".to_owned()));
        };
        result.map_err(|e| paint_err(&e))?;
        Ok(ImageHandle::new(scratch))
    }
}

// =============================================================
// Surface host
// =============================================================

/// One window's DOM: a chrome `div` holding the visible canvas, plus a detached buffer canvas.
pub struct DomSurfaceHost {
    document: Document,
    chrome: HtmlElement,
    canvas: HtmlCanvasElement,
    visible: CanvasRenderingContext2d,
    buffer: HtmlCanvasElement,
}

impl DomSurfaceHost {
    /// Create the chrome element and both canvases. Nothing is attached yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be created or has no 2D context.
    pub fn new() -> Result<Self, ScreenError> {
        let document = document()?;
        let chrome = document
            .create_element("div")
            .map_err(|e| dom_err(&e))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ScreenError::Dom("created element is not a div".to_owned()))?;
        let canvas = create_canvas(&document)?;
        chrome.append_child(&canvas).map_err(|e| dom_err(&e))?;
        set_style(&canvas, "display", "block");
        let visible = context_2d(&canvas)?;
        let buffer = create_canvas(&document)?;
        Ok(Self { document, chrome, canvas, visible, buffer })
    }

    /// The visible canvas, for hosts that want to listen on it directly.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl SurfaceHost for DomSurfaceHost {
    type Context = CanvasContext;

    fn buffer_context(&mut self) -> Result<CanvasContext, ScreenError> {
        Ok(CanvasContext::new(context_2d(&self.buffer)?, self.document.clone()))
    }

    fn attach(&mut self, parent: &Parent) -> Result<(), ScreenError> {
        let parent: Element = match parent {
            Parent::Body => self
                .document
                .body()
                .map(Element::from)
                .ok_or_else(|| ScreenError::Dom("document has no body".to_owned()))?,
            Parent::Container(name) => self
                .document
                .get_element_by_id(name)
                .ok_or_else(|| ScreenError::Dom(format!("no element with id {name}")))?,
        };
        parent.append_child(&self.chrome).map_err(|e| dom_err(&e))?;
        Ok(())
    }

    fn detach(&mut self) {
        self.chrome.remove();
    }

    fn container_bounds(&self, name: &str) -> Option<Rect> {
        let element = self.document.get_element_by_id(name)?;
        let rect = element.get_bounding_client_rect();
        let (scroll_x, scroll_y) = web_sys::window()
            .map(|w| (w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0)))
            .unwrap_or_default();
        Some(Rect::new(
            rect.x() + scroll_x,
            rect.y() + scroll_y,
            f64::from(element.client_width()),
            f64::from(element.client_height()),
        ))
    }

    fn viewport(&self) -> Size {
        let Some(window) = web_sys::window() else {
            return Size::new(0.0, 0.0);
        };
        let width = window.inner_width().map(|v| v.as_f64().unwrap_or(0.0)).unwrap_or(0.0);
        let height = window.inner_height().map(|v| v.as_f64().unwrap_or(0.0)).unwrap_or(0.0);
        Size::new(width, height)
    }

    fn set_chrome_style(&mut self, property: &str, value: &str) {
        set_style(&self.chrome, property, value);
    }

    fn set_canvas_style(&mut self, property: &str, value: &str) {
        set_style(&self.canvas, property, value);
    }

    fn set_body_style(&mut self, property: &str, value: &str) -> Option<String> {
        let body = self.document.body()?;
        let style = body.style();
        let previous = match style.get_property_value(property) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("body style {property} unreadable: {e:?}");
                None
            }
        };
        set_style(&body, property, value);
        previous
    }

    fn size_canvases(&mut self, _css: Size, backing_width: u32, backing_height: u32) {
        // The chrome is border-box and the canvas fills it, so CSS size follows the chrome.
        self.canvas.set_width(backing_width);
        self.canvas.set_height(backing_height);
        self.buffer.set_width(backing_width);
        self.buffer.set_height(backing_height);
    }

    fn blit(&mut self, pixels: &Rect) {
        if pixels.is_empty() {
            return;
        }
        let (x, y, w, h) = (pixels.x, pixels.y, pixels.width, pixels.height);
        self.visible.clear_rect(x, y, w, h);
        if let Err(e) = self
            .visible
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(&self.buffer, x, y, w, h, x, y, w, h)
        {
            log::warn!("blit failed: {e:?}");
        }
    }
}

// =============================================================
// Scheduler
// =============================================================

/// [`Scheduler`] over `gloo_timers`; the browser event loop runs the callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

/// A live gloo timer. Dropping it cancels the timer.
pub enum TimerHandle {
    Timeout { _timer: Timeout },
    Interval { _timer: Interval },
}

impl Scheduler for BrowserScheduler {
    type Handle = TimerHandle;

    fn timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::Timeout { _timer: Timeout::new(delay_ms, callback) }
    }

    fn interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::Interval { _timer: Interval::new(period_ms, callback) }
    }
}

// =============================================================
// Native events
// =============================================================

fn mouse_modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

fn mouse_sample(ev: &MouseEvent) -> PointerSample {
    PointerSample::new(
        Point::new(f64::from(ev.page_x()), f64::from(ev.page_y())),
        Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
    )
}

fn touch_samples(list: &TouchList) -> Vec<PointerSample> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| {
            PointerSample::new(
                Point::new(f64::from(t.page_x()), f64::from(t.page_y())),
                Point::new(f64::from(t.client_x()), f64::from(t.client_y())),
            )
        })
        .collect()
}

/// Convert a DOM event into a [`NativeEvent`] by its type string.
#[must_use]
pub fn native_event(ev: &Event) -> Option<NativeEvent> {
    let kind = ev.type_();
    match kind.as_str() {
        "mousedown" | "mousemove" | "mouseup" => {
            let mouse = ev.dyn_ref::<MouseEvent>()?;
            let phase = match kind.as_str() {
                "mousedown" => PointerPhase::Down,
                "mousemove" => PointerPhase::Move,
                _ => PointerPhase::Up,
            };
            Some(NativeEvent::Mouse {
                phase,
                sample: mouse_sample(mouse),
                button: Button::from_dom(mouse.button()),
                modifiers: mouse_modifiers(mouse),
            })
        }
        "touchstart" | "touchmove" | "touchend" => {
            let touch = ev.dyn_ref::<TouchEvent>()?;
            let (phase, list) = match kind.as_str() {
                "touchstart" => (TouchPhase::Start, touch.touches()),
                "touchmove" => (TouchPhase::Move, touch.touches()),
                // The lifted finger is no longer in `touches`.
                _ => (TouchPhase::End, touch.changed_touches()),
            };
            Some(NativeEvent::Touch {
                phase,
                touches: touch_samples(&list),
                modifiers: Modifiers {
                    shift: touch.shift_key(),
                    ctrl: touch.ctrl_key(),
                    alt: touch.alt_key(),
                    meta: touch.meta_key(),
                },
            })
        }
        "wheel" => {
            let wheel = ev.dyn_ref::<WheelEvent>()?;
            Some(NativeEvent::Wheel {
                sample: mouse_sample(wheel),
                delta: WheelDelta { dx: wheel.delta_x(), dy: wheel.delta_y() },
                modifiers: mouse_modifiers(wheel),
            })
        }
        "keydown" | "keyup" => {
            let key = ev.dyn_ref::<KeyboardEvent>()?;
            Some(NativeEvent::Key {
                phase: if kind == "keydown" { KeyPhase::Down } else { KeyPhase::Up },
                key_code: key.key_code(),
                key: key.key(),
                modifiers: Modifiers {
                    shift: key.shift_key(),
                    ctrl: key.ctrl_key(),
                    alt: key.alt_key(),
                    meta: key.meta_key(),
                },
            })
        }
        "pointerdown" => {
            let pointer = ev.dyn_ref::<PointerEvent>()?;
            Some(NativeEvent::PointerDown { pointer_id: pointer.pointer_id() })
        }
        _ => None,
    }
}

const DOCUMENT_EVENTS: [&str; 10] = [
    "mousedown",
    "mousemove",
    "mouseup",
    "touchstart",
    "touchmove",
    "touchend",
    "wheel",
    "keydown",
    "keyup",
    "pointerdown",
];

// =============================================================
// Install
// =============================================================

/// Route `log` records to the browser console and panics to `console.error`.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(level) {
        // A second install keeps the first logger.
        log::debug!("console logger already installed: {e}");
    }
}

/// Read scale, touch and pointer-capture support from the browser.
#[must_use]
pub fn detect_capabilities() -> DeviceCapabilities {
    let Some(window) = web_sys::window() else {
        return DeviceCapabilities::default();
    };
    let touch = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    let pointer_capture = window
        .document()
        .and_then(|d| d.document_element())
        .map(|el| js_sys::Reflect::has(&el, &JsValue::from_str("setPointerCapture")).unwrap_or(false))
        .unwrap_or(false);
    DeviceCapabilities::from_pixel_ratio(window.device_pixel_ratio().max(1.0), touch, pointer_capture)
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self.target.remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref()) {
            log::warn!("failed to remove {} listener: {e:?}", self.kind);
        }
    }
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, ScreenError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    // Document touch listeners default to passive, which ignores preventDefault.
    let added = if kind.starts_with("touch") {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        )
    } else {
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
    };
    added.map_err(|e| dom_err(&e))?;
    Ok(Listener { target: target.clone(), kind, closure })
}

type DomScreen = Screen<DomSurfaceHost, BrowserScheduler>;

fn apply_host_actions(document: &Document, element_id: &str, ev: &Event, actions: Vec<HostAction>) {
    for action in actions {
        match action {
            HostAction::PreventDefault => ev.prevent_default(),
            HostAction::CapturePointer { pointer_id } => {
                let Some(element) = document.get_element_by_id(element_id) else {
                    log::debug!("no #{element_id} to capture pointer {pointer_id}");
                    continue;
                };
                if let Err(e) = element.set_pointer_capture(pointer_id) {
                    log::warn!("pointer capture failed: {e:?}");
                }
            }
        }
    }
}

/// A screen wired into the current document. Dropping it removes every listener.
pub struct BrowserScreen {
    screen: DomScreen,
    _listeners: Vec<Listener>,
}

impl BrowserScreen {
    #[must_use]
    pub fn screen(&self) -> &DomScreen {
        &self.screen
    }

    /// Create a window backed by fresh DOM elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the elements cannot be created.
    pub fn create_window(&self, window: Window, view: Box<dyn View>) -> Result<WindowId, ScreenError> {
        self.screen.create_window(window, DomSurfaceHost::new()?, view)
    }
}

/// Install a screen on the current document.
///
/// Parses `config_json`, starts console logging, detects device capabilities
/// and subscribes to document input, window focus and viewport resize.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a listener cannot be added.
pub fn install(config_json: &str) -> Result<BrowserScreen, ScreenError> {
    init_logging(log::Level::Info);
    let config = ScreenConfig::from_json(config_json)?;
    let element_id = config.screen_element_id.clone();
    let caps = detect_capabilities();
    log::info!("screen installed at scale {} (touch: {})", caps.scale_factor, caps.touch);

    let screen: DomScreen = Screen::new(config, caps, BrowserScheduler);
    let document = document()?;
    let window = web_sys::window().ok_or_else(|| ScreenError::Dom("no window".to_owned()))?;
    let mut listeners = Vec::new();

    let element_id = Rc::new(element_id);
    for kind in DOCUMENT_EVENTS {
        let screen = screen.clone();
        let doc = document.clone();
        let element_id = Rc::clone(&element_id);
        listeners.push(listen(&document, kind, move |ev: Event| {
            let Some(native) = native_event(&ev) else {
                log::debug!("ignored {} event", ev.type_());
                return;
            };
            let actions = screen.handle_native(&native, Date::now());
            apply_host_actions(&doc, &element_id, &ev, actions);
        })?);
    }

    for (kind, focused) in [("focus", true), ("blur", false)] {
        let screen = screen.clone();
        listeners.push(listen(&window, kind, move |_ev: Event| screen.document_focus_changed(focused))?);
    }

    let resize_screen = screen.clone();
    listeners.push(listen(&window, "resize", move |_ev: Event| resize_screen.viewport_resized())?);

    Ok(BrowserScreen { screen, _listeners: listeners })
}
