//! Window surfaces: one window's chrome element, canvas pair and lifecycle.
//!
//! A [`WindowSurface`] owns the DOM side of a window through a [`SurfaceHost`]:
//! a chrome element wrapping a visible canvas, plus an offscreen buffer canvas
//! of the same size that the painter draws into. The visible canvas is only
//! ever written by [`SurfaceHost::blit`], copying a damaged region out of the
//! buffer after the view has painted it.
//!
//! Surfaces share the screen's [`ScreenRouter`] (injected at construction) and
//! keep it in sync with their window: showing registers the window, hiding
//! unregisters it, and geometry changes are pushed with `sync_window`.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::capability::DeviceCapabilities;
use crate::config::ScreenConfig;
use crate::error::ScreenError;
use crate::geom::{Rect, Size, Transform};
use crate::paint::{Context2d, ImmediatePainter, Painter};
use crate::router::ScreenRouter;
use crate::shape::Shape;
use crate::view::View;
use crate::window::{Window, WindowId};

/// Where a window's chrome element is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// Floating over the page body.
    Body,
    /// Inside the element with this id, filling it.
    Container(String),
}

/// Mouse cursor shown over a window's canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Hand,
    Move,
    Text,
    None,
    NResize,
    SResize,
    EResize,
    WResize,
    NeResize,
    NwResize,
    SeResize,
    SwResize,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Hand => "pointer",
            Self::Move => "move",
            Self::Text => "text",
            Self::None => "none",
            Self::NResize => "n-resize",
            Self::SResize => "s-resize",
            Self::EResize => "e-resize",
            Self::WResize => "w-resize",
            Self::NeResize => "ne-resize",
            Self::NwResize => "nw-resize",
            Self::SeResize => "se-resize",
            Self::SwResize => "sw-resize",
        }
    }
}

/// DOM operations a window surface needs. Implemented over `web_sys` in
/// [`crate::dom`]; tests use a recording double.
pub trait SurfaceHost {
    type Context: Context2d;

    /// The 2D context of the offscreen buffer canvas.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::MissingContext`] if the canvas has no 2D context.
    fn buffer_context(&mut self) -> Result<Self::Context, ScreenError>;

    /// Attach the chrome element under `parent`, moving it if already attached.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Dom`] if the element cannot be appended.
    fn attach(&mut self, parent: &Parent) -> Result<(), ScreenError>;

    /// Remove the chrome element from the document.
    fn detach(&mut self);

    /// Page-space bounds of the container element with this id, if it exists.
    fn container_bounds(&self, name: &str) -> Option<Rect>;

    /// Viewport size in logical pixels.
    fn viewport(&self) -> Size;

    fn set_chrome_style(&mut self, property: &str, value: &str);
    fn set_canvas_style(&mut self, property: &str, value: &str);

    /// Set a style on the page body and return the previous value.
    fn set_body_style(&mut self, property: &str, value: &str) -> Option<String>;

    /// Size both canvases: CSS size `css`, backing store `backing_width × backing_height` pixels.
    fn size_canvases(&mut self, css: Size, backing_width: u32, backing_height: u32);

    /// Copy the `pixels` rectangle from the buffer canvas to the visible canvas.
    fn blit(&mut self, pixels: &Rect);
}

/// Resolves when the modal window that produced it is hidden.
#[derive(Debug)]
pub struct ModalWait {
    rx: oneshot::Receiver<()>,
}

impl Future for ModalWait {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // A dropped surface cancels the channel; that ends the wait too.
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

/// The chrome styling shared by every surface on a screen.
#[derive(Debug, Clone)]
struct ChromeStyle {
    background: String,
    shadow: String,
    padding: f64,
}

/// One window's drawing surface and DOM presence.
pub struct WindowSurface<H: SurfaceHost> {
    window: Window,
    router: Rc<RefCell<ScreenRouter>>,
    host: H,
    painter: ImmediatePainter<H::Context>,
    scale: u32,
    chrome: ChromeStyle,
    parent: Option<Parent>,
    saved_margin: Option<String>,
    saved_overflow: Option<String>,
    restore_bounds: Option<Rect>,
    resize_subscribed: bool,
    cursor: Cursor,
    modal_waiters: Vec<oneshot::Sender<()>>,
}

impl<H: SurfaceHost> WindowSurface<H> {
    /// Build the surface for `window` and size its canvases. The window stays hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot provide a buffer context.
    pub fn new(
        window: Window,
        router: Rc<RefCell<ScreenRouter>>,
        mut host: H,
        caps: &DeviceCapabilities,
        config: &ScreenConfig,
    ) -> Result<Self, ScreenError> {
        let ctx = host.buffer_context()?;
        let mut surface = Self {
            window,
            router,
            host,
            painter: ImmediatePainter::new(ctx, caps.scale()),
            scale: caps.scale_factor,
            chrome: ChromeStyle {
                background: config.chrome_background.clone(),
                shadow: config.chrome_shadow.clone(),
                padding: config.maximized_padding_px,
            },
            parent: None,
            saved_margin: None,
            saved_overflow: None,
            restore_bounds: None,
            resize_subscribed: false,
            cursor: Cursor::Default,
            modal_waiters: Vec::new(),
        };
        surface.host.set_chrome_style("box-sizing", "border-box");
        surface.host.set_chrome_style("background", &surface.chrome.background);
        surface.host.set_canvas_style("width", "100%");
        surface.host.set_canvas_style("height", "100%");
        surface.apply_size();
        Ok(surface)
    }

    // --- Queries ---

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn id(&self) -> WindowId {
        self.window.id
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.window.visible
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    /// Whether this surface wants viewport-resize notifications (attached to the body).
    #[must_use]
    pub fn wants_resize(&self) -> bool {
        self.resize_subscribed
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Lifecycle ---

    /// Attach the window, register it with the router and give it focus.
    ///
    /// Showing a window that is already visible brings it to the front.
    ///
    /// # Errors
    ///
    /// Returns an error if the chrome element cannot be attached.
    pub fn show(&mut self) -> Result<(), ScreenError> {
        if self.window.visible {
            self.to_front();
            return Ok(());
        }
        self.reset_parent_and_bounds()?;
        self.window.visible = true;
        self.window.focused = true;
        let z = self.router.borrow_mut().add_window(self.window.clone());
        self.set_z(z);
        self.resize_subscribed = self.parent == Some(Parent::Body);
        log::debug!("window {} shown at z {z}", self.window.id);
        Ok(())
    }

    /// Show the window and return a future that resolves once it is hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be shown.
    pub fn show_modal(&mut self) -> Result<ModalWait, ScreenError> {
        self.show()?;
        let (tx, rx) = oneshot::channel();
        self.modal_waiters.push(tx);
        Ok(ModalWait { rx })
    }

    /// Detach the window and unregister it. Returns `false` if it was not showing.
    ///
    /// Pending modal waits resolve. The caller tells the view it was closed.
    pub fn hide(&mut self) -> bool {
        if !self.window.visible {
            return false;
        }
        self.host.detach();
        self.parent = None;
        self.router.borrow_mut().remove_window(&self.window.id);
        self.window.visible = false;
        self.window.focused = false;
        self.resize_subscribed = false;
        if let Some(prev) = self.saved_margin.take() {
            self.host.set_body_style("margin", &prev);
        }
        if let Some(prev) = self.saved_overflow.take() {
            self.host.set_body_style("overflow", &prev);
        }
        for waiter in self.modal_waiters.drain(..) {
            if waiter.send(()).is_err() {
                log::debug!("modal wait for window {} was already dropped", self.window.id);
            }
        }
        log::debug!("window {} hidden", self.window.id);
        true
    }

    /// Raise the window above every other showing window.
    pub fn to_front(&mut self) {
        if !self.window.visible {
            return;
        }
        let z = self.router.borrow_mut().to_front(&self.window.id);
        if let Some(z) = z {
            self.set_z(z);
        }
    }

    /// The document gained or lost focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.window.focused = focused;
    }

    // --- Geometry ---

    /// Move or resize the window. Canvases are resized to match.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.window.bounds == bounds {
            return;
        }
        self.window.bounds = bounds;
        self.apply_bounds();
        self.sync_router();
    }

    /// Fill the viewport, or return to the bounds held before maximizing.
    ///
    /// # Errors
    ///
    /// Returns an error if a showing window cannot be re-attached.
    pub fn set_maximized(&mut self, maximized: bool) -> Result<(), ScreenError> {
        if self.window.maximized == maximized {
            return Ok(());
        }
        if maximized {
            self.restore_bounds = Some(self.window.bounds);
        }
        self.window.maximized = maximized;
        if !maximized {
            if let Some(bounds) = self.restore_bounds.take() {
                self.window.bounds = bounds;
            }
        }
        if self.window.visible {
            self.reset_parent_and_bounds()?;
            self.resize_subscribed = self.parent == Some(Parent::Body);
        }
        Ok(())
    }

    /// Re-fit a maximized window after the viewport changed. Returns `true` if the bounds changed.
    pub fn viewport_resized(&mut self) -> bool {
        if !self.window.visible || !self.window.maximized {
            return false;
        }
        let bounds = self.maximized_bounds();
        if bounds == self.window.bounds {
            return false;
        }
        self.window.bounds = bounds;
        self.apply_bounds();
        self.sync_router();
        true
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor == cursor {
            return;
        }
        self.cursor = cursor;
        self.host.set_canvas_style("cursor", cursor.css());
    }

    // --- Painting ---

    /// Paint `region` (window-local) into the buffer through `view`, then blit it.
    pub fn paint_views(&mut self, region: Rect, view: &mut dyn View) {
        let frame = Rect::from_size(self.window.bounds.size());
        let Some(region) = region.intersection(&frame) else {
            return;
        };
        let base = self.painter.depth();
        self.painter.set_transform(&Transform::IDENTITY);
        self.painter.save();
        self.painter.clip(&Shape::Rect(region));
        // The buffer keeps old pixels; translucent paint must not accumulate.
        self.painter.clear_rect(region);
        view.paint(&mut self.painter, region);
        let depth = self.painter.depth();
        if depth < base + 1 {
            log::error!(
                "view for window {} restored {} more time(s) than it saved",
                self.window.id,
                base + 1 - depth
            );
        } else if depth > base + 1 {
            log::error!("view for window {} left {} unmatched save(s)", self.window.id, depth - base - 1);
        }
        while self.painter.depth() > base {
            if let Err(e) = self.painter.restore() {
                log::error!("paint restore failed: {e}");
                break;
            }
        }
        self.host.blit(&region.scaled(f64::from(self.scale)).round_out());
    }

    // --- Internals ---

    fn sync_router(&self) {
        if self.window.visible {
            self.router.borrow_mut().sync_window(&self.window);
        }
    }

    fn set_z(&mut self, z: u64) {
        self.window.z_index = z;
        self.host.set_chrome_style("z-index", &z.to_string());
    }

    fn resolve_parent(&self) -> Parent {
        if self.window.maximized {
            return Parent::Body;
        }
        match &self.window.name {
            Some(name) if self.host.container_bounds(name).is_some() => Parent::Container(name.clone()),
            _ => Parent::Body,
        }
    }

    /// Attach to the resolved parent and bring chrome styles and bounds in line with it.
    fn reset_parent_and_bounds(&mut self) -> Result<(), ScreenError> {
        let parent = self.resolve_parent();
        self.host.attach(&parent)?;
        match &parent {
            Parent::Body => {
                let position = if self.window.maximized { "fixed" } else { "absolute" };
                self.host.set_chrome_style("position", position);
                let shadow = if self.window.maximized { "none" } else { self.chrome.shadow.as_str() };
                self.host.set_chrome_style("box-shadow", shadow);
                if self.saved_margin.is_none() {
                    self.saved_margin = Some(self.host.set_body_style("margin", "0").unwrap_or_default());
                }
            }
            Parent::Container(name) => {
                if let Some(prev) = self.saved_margin.take() {
                    self.host.set_body_style("margin", &prev);
                }
                self.host.set_chrome_style("position", "static");
                self.host.set_chrome_style("box-shadow", "none");
                self.host.set_chrome_style("width", "100%");
                self.host.set_chrome_style("height", "100%");
                if let Some(bounds) = self.host.container_bounds(name) {
                    self.window.bounds = bounds;
                }
            }
        }
        self.parent = Some(parent);
        self.apply_maximize_chrome();
        if self.window.maximized {
            self.window.bounds = self.maximized_bounds();
        }
        self.apply_bounds();
        self.sync_router();
        Ok(())
    }

    fn apply_maximize_chrome(&mut self) {
        if self.window.maximized {
            if self.saved_overflow.is_none() {
                self.saved_overflow = Some(self.host.set_body_style("overflow", "hidden").unwrap_or_default());
            }
            let padding = format!("{}px", self.chrome.padding);
            self.host.set_chrome_style("padding", &padding);
            let shadow = self.chrome.shadow.clone();
            self.host.set_canvas_style("box-shadow", &shadow);
        } else {
            if let Some(prev) = self.saved_overflow.take() {
                self.host.set_body_style("overflow", &prev);
            }
            self.host.set_chrome_style("padding", "0");
            self.host.set_canvas_style("box-shadow", "none");
        }
    }

    /// Canvas bounds of a maximized window: the viewport inset by the chrome padding.
    fn maximized_bounds(&self) -> Rect {
        let viewport = self.host.viewport();
        let pad = self.chrome.padding;
        Rect::new(pad, pad, (viewport.width - 2.0 * pad).max(0.0), (viewport.height - 2.0 * pad).max(0.0))
    }

    fn apply_bounds(&mut self) {
        if self.parent != Some(Parent::Body) && self.parent.is_some() {
            // Container-hosted chrome is laid out by its container.
            self.apply_size();
            return;
        }
        let pad = if self.window.maximized { self.chrome.padding } else { 0.0 };
        let b = self.window.bounds;
        self.host.set_chrome_style("left", &format!("{}px", b.x - pad));
        self.host.set_chrome_style("top", &format!("{}px", b.y - pad));
        self.host.set_chrome_style("width", &format!("{}px", b.width + 2.0 * pad));
        self.host.set_chrome_style("height", &format!("{}px", b.height + 2.0 * pad));
        self.apply_size();
    }

    /// Resize both canvases to the window's logical size times the device scale.
    fn apply_size(&mut self) {
        let size = Size::new(self.window.bounds.width.max(0.0), self.window.bounds.height.max(0.0));
        let width = backing_px(size.width, self.scale);
        let height = backing_px(size.height, self.scale);
        self.host.size_canvases(size, width, height);
        // Resizing a canvas resets its context state.
        self.painter.sync_context();
    }
}

/// Backing-store pixels for a logical length.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn backing_px(len: f64, scale: u32) -> u32 {
    (len.ceil().max(0.0) as u32).saturating_mul(scale)
}
