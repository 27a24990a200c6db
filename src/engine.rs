//! Screen root: the testable [`ScreenCore`] and the timer-driven [`Screen`] shell.
//!
//! `ScreenCore` owns the router and every window (surface plus view) and does
//! all the work for one event-handling turn. `Screen` wraps it with a
//! [`Scheduler`] so that coalesced repaints and debounced viewport resizes
//! run on later ticks. Neither touches `web_sys` directly; the browser
//! backends in [`crate::dom`] plug in through [`SurfaceHost`] and
//! [`Scheduler`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::capability::DeviceCapabilities;
use crate::config::ScreenConfig;
use crate::error::ScreenError;
use crate::geom::Rect;
use crate::input::InputEvent;
use crate::normalize::NativeEvent;
use crate::router::{Action, ScreenRouter};
use crate::schedule::{Debouncer, RepaintQueue, Scheduler};
use crate::surface::{Cursor, ModalWait, SurfaceHost, WindowSurface};
use crate::view::{View, ViewRequest};
use crate::window::{Window, WindowId};

/// Work the browser shell has to do after the core handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Capture this pointer on the screen element.
    CapturePointer { pointer_id: i32 },
    /// Cancel the browser default for the event that was just handled.
    PreventDefault,
}

struct Entry<H: SurfaceHost> {
    surface: WindowSurface<H>,
    view: Box<dyn View>,
}

/// Core screen state: all logic that doesn't depend on timers or the browser.
pub struct ScreenCore<H: SurfaceHost> {
    config: ScreenConfig,
    caps: DeviceCapabilities,
    router: Rc<RefCell<ScreenRouter>>,
    entries: HashMap<WindowId, Entry<H>>,
    repaints: RepaintQueue,
    repaint_requested: bool,
}

impl<H: SurfaceHost> ScreenCore<H> {
    #[must_use]
    pub fn new(config: ScreenConfig, caps: DeviceCapabilities) -> Self {
        let caps = caps.with_scale_override(config.device_scale);
        let router = ScreenRouter::new(config.click_interval_ms, caps.pointer_capture);
        Self {
            config,
            caps,
            router: Rc::new(RefCell::new(router)),
            entries: HashMap::new(),
            repaints: RepaintQueue::new(),
            repaint_requested: false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    #[must_use]
    pub fn capabilities(&self) -> DeviceCapabilities {
        self.caps
    }

    #[must_use]
    pub fn router(&self) -> Ref<'_, ScreenRouter> {
        self.router.borrow()
    }

    #[must_use]
    pub fn surface(&self, id: &WindowId) -> Option<&WindowSurface<H>> {
        self.entries.get(id).map(|e| &e.surface)
    }

    #[must_use]
    pub fn window(&self, id: &WindowId) -> Option<&Window> {
        self.surface(id).map(WindowSurface::window)
    }

    /// Pending damage for a window, not yet flushed.
    #[must_use]
    pub fn pending_repaint(&self, id: &WindowId) -> Option<Rect> {
        self.repaints.pending(id)
    }

    /// Whether a flush has to be scheduled. Clears the flag.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }

    // --- Window lifecycle ---

    /// Create the surface for `window` on `host` and attach `view` to it. The window starts hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot get a drawing context.
    pub fn create_window(&mut self, window: Window, host: H, view: Box<dyn View>) -> Result<WindowId, ScreenError> {
        let id = window.id;
        let surface = WindowSurface::new(window, Rc::clone(&self.router), host, &self.caps, &self.config)?;
        self.entries.insert(id, Entry { surface, view });
        log::debug!("window {id} created");
        Ok(id)
    }

    /// Hide a window and forget it entirely.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] if no such window exists.
    pub fn destroy_window(&mut self, id: &WindowId) -> Result<(), ScreenError> {
        self.hide(id)?;
        self.entries.remove(id);
        Ok(())
    }

    /// Show a window and schedule a full repaint.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] for an unknown id, or the attach failure.
    pub fn show(&mut self, id: &WindowId) -> Result<(), ScreenError> {
        self.entry_mut(id)?.surface.show()?;
        self.repaint_all(id);
        Ok(())
    }

    /// Show a window and return a future that resolves once it is hidden.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] for an unknown id, or the attach failure.
    pub fn show_modal(&mut self, id: &WindowId) -> Result<ModalWait, ScreenError> {
        let wait = self.entry_mut(id)?.surface.show_modal()?;
        self.repaint_all(id);
        Ok(wait)
    }

    /// Hide a window and tell its view. Returns `false` if it was not showing.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] if no such window exists.
    pub fn hide(&mut self, id: &WindowId) -> Result<bool, ScreenError> {
        let entry = self.entry_mut(id)?;
        if !entry.surface.hide() {
            return Ok(false);
        }
        entry.view.window_closed();
        self.repaints.cancel(id);
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] if no such window exists.
    pub fn to_front(&mut self, id: &WindowId) -> Result<(), ScreenError> {
        self.entry_mut(id)?.surface.to_front();
        Ok(())
    }

    /// Move or resize a window and repaint it.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] if no such window exists.
    pub fn set_bounds(&mut self, id: &WindowId, bounds: Rect) -> Result<(), ScreenError> {
        self.entry_mut(id)?.surface.set_bounds(bounds);
        self.repaint_all(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] for an unknown id, or the re-attach failure.
    pub fn set_maximized(&mut self, id: &WindowId, maximized: bool) -> Result<(), ScreenError> {
        self.entry_mut(id)?.surface.set_maximized(maximized)?;
        self.repaint_all(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownWindow`] if no such window exists.
    pub fn set_cursor(&mut self, id: &WindowId, cursor: Cursor) -> Result<(), ScreenError> {
        self.entry_mut(id)?.surface.set_cursor(cursor);
        Ok(())
    }

    // --- Input ---

    /// Route one native event and deliver the result to views.
    pub fn handle_native(&mut self, native: &NativeEvent, now_ms: f64) -> Vec<HostAction> {
        // The router borrow ends here; views may cause router updates below.
        let actions = self.router.borrow_mut().handle(native, now_ms);
        self.apply_actions(actions)
    }

    /// The browser document gained or lost focus.
    pub fn document_focus_changed(&mut self, focused: bool) {
        let actions = self.router.borrow_mut().document_focus_changed(focused);
        self.apply_actions(actions);
    }

    fn apply_actions(&mut self, actions: Vec<Action>) -> Vec<HostAction> {
        let mut host = Vec::new();
        for action in actions {
            match action {
                Action::Deliver(event) => self.deliver(&event),
                Action::Focus { window, focused } => {
                    if let Some(entry) = self.entries.get_mut(&window) {
                        entry.surface.set_focused(focused);
                        entry.view.focus_changed(focused);
                    }
                }
                Action::CapturePointer { pointer_id } => host.push(HostAction::CapturePointer { pointer_id }),
                Action::PreventDefault => host.push(HostAction::PreventDefault),
            }
        }
        host
    }

    fn deliver(&mut self, event: &InputEvent) {
        let id = event.window();
        let Some(entry) = self.entries.get_mut(&id) else {
            log::debug!("{:?} for removed window {id} dropped", event.kind());
            return;
        };
        let requests = entry.view.handle_event(event);
        for request in requests {
            self.apply_request(&id, request);
        }
    }

    fn apply_request(&mut self, id: &WindowId, request: ViewRequest) {
        let result = match request {
            ViewRequest::Repaint(region) => {
                self.request_repaint(id, region);
                Ok(())
            }
            ViewRequest::RepaintAll => {
                self.repaint_all(id);
                Ok(())
            }
            ViewRequest::ToFront => self.to_front(id),
            ViewRequest::Close => self.hide(id).map(|_| ()),
            ViewRequest::SetCursor(cursor) => self.set_cursor(id, cursor),
            ViewRequest::SetBounds(bounds) => self.set_bounds(id, bounds),
            ViewRequest::SetMaximized(maximized) => self.set_maximized(id, maximized),
        };
        if let Err(e) = result {
            log::warn!("view request for window {id} failed: {e}");
        }
    }

    // --- Painting ---

    /// Mark `region` (window-local) of a showing window as damaged.
    pub fn request_repaint(&mut self, id: &WindowId, region: Rect) {
        let showing = self.entries.get(id).is_some_and(|e| e.surface.is_visible());
        if showing && self.repaints.request(*id, region) {
            self.repaint_requested = true;
        }
    }

    fn repaint_all(&mut self, id: &WindowId) {
        if let Some(entry) = self.entries.get(id) {
            let frame = Rect::from_size(entry.surface.window().bounds.size());
            self.request_repaint(id, frame);
        }
    }

    /// Paint every pending region. Windows hidden or destroyed since the request are skipped.
    pub fn flush_repaints(&mut self) {
        for (id, region) in self.repaints.drain() {
            let Some(Entry { surface, view }) = self.entries.get_mut(&id) else {
                continue;
            };
            if surface.is_visible() {
                surface.paint_views(region, view.as_mut());
            }
        }
    }

    // --- Viewport ---

    /// Re-fit body-attached windows after a viewport resize.
    pub fn viewport_resized(&mut self) {
        let changed: Vec<WindowId> = self
            .entries
            .iter_mut()
            .filter(|(_, e)| e.surface.wants_resize())
            .filter_map(|(id, e)| e.surface.viewport_resized().then_some(*id))
            .collect();
        for id in &changed {
            self.repaint_all(id);
        }
    }

    fn entry_mut(&mut self, id: &WindowId) -> Result<&mut Entry<H>, ScreenError> {
        self.entries.get_mut(id).ok_or(ScreenError::UnknownWindow(*id))
    }
}

/// A [`ScreenCore`] plus the timers that drive deferred work.
///
/// Clones share the same core and timers, so event listeners can each hold one.
pub struct Screen<H: SurfaceHost, S: Scheduler> {
    core: Rc<RefCell<ScreenCore<H>>>,
    scheduler: S,
    repaint_timer: Rc<RefCell<Option<S::Handle>>>,
    resize: Rc<RefCell<Debouncer<S>>>,
}

impl<H: SurfaceHost, S: Scheduler + Clone> Clone for Screen<H, S> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            scheduler: self.scheduler.clone(),
            repaint_timer: Rc::clone(&self.repaint_timer),
            resize: Rc::clone(&self.resize),
        }
    }
}

impl<H, S> Screen<H, S>
where
    H: SurfaceHost + 'static,
    S: Scheduler + Clone + 'static,
{
    #[must_use]
    pub fn new(config: ScreenConfig, caps: DeviceCapabilities, scheduler: S) -> Self {
        let resize = Debouncer::new(config.resize_debounce_ms);
        Self {
            core: Rc::new(RefCell::new(ScreenCore::new(config, caps))),
            scheduler,
            repaint_timer: Rc::new(RefCell::new(None)),
            resize: Rc::new(RefCell::new(resize)),
        }
    }

    #[must_use]
    pub fn core(&self) -> Ref<'_, ScreenCore<H>> {
        self.core.borrow()
    }

    /// # Errors
    ///
    /// See [`ScreenCore::create_window`].
    pub fn create_window(&self, window: Window, host: H, view: Box<dyn View>) -> Result<WindowId, ScreenError> {
        self.core.borrow_mut().create_window(window, host, view)
    }

    /// # Errors
    ///
    /// See [`ScreenCore::destroy_window`].
    pub fn destroy_window(&self, id: &WindowId) -> Result<(), ScreenError> {
        self.core.borrow_mut().destroy_window(id)
    }

    /// # Errors
    ///
    /// See [`ScreenCore::show`].
    pub fn show(&self, id: &WindowId) -> Result<(), ScreenError> {
        let result = self.core.borrow_mut().show(id);
        self.schedule_repaint();
        result
    }

    /// # Errors
    ///
    /// See [`ScreenCore::show_modal`].
    pub fn show_modal(&self, id: &WindowId) -> Result<ModalWait, ScreenError> {
        let result = self.core.borrow_mut().show_modal(id);
        self.schedule_repaint();
        result
    }

    /// # Errors
    ///
    /// See [`ScreenCore::hide`].
    pub fn hide(&self, id: &WindowId) -> Result<bool, ScreenError> {
        self.core.borrow_mut().hide(id)
    }

    /// # Errors
    ///
    /// See [`ScreenCore::to_front`].
    pub fn to_front(&self, id: &WindowId) -> Result<(), ScreenError> {
        self.core.borrow_mut().to_front(id)
    }

    /// # Errors
    ///
    /// See [`ScreenCore::set_bounds`].
    pub fn set_bounds(&self, id: &WindowId, bounds: Rect) -> Result<(), ScreenError> {
        let result = self.core.borrow_mut().set_bounds(id, bounds);
        self.schedule_repaint();
        result
    }

    /// # Errors
    ///
    /// See [`ScreenCore::set_maximized`].
    pub fn set_maximized(&self, id: &WindowId, maximized: bool) -> Result<(), ScreenError> {
        let result = self.core.borrow_mut().set_maximized(id, maximized);
        self.schedule_repaint();
        result
    }

    /// # Errors
    ///
    /// See [`ScreenCore::set_cursor`].
    pub fn set_cursor(&self, id: &WindowId, cursor: Cursor) -> Result<(), ScreenError> {
        self.core.borrow_mut().set_cursor(id, cursor)
    }

    pub fn request_repaint(&self, id: &WindowId, region: Rect) {
        self.core.borrow_mut().request_repaint(id, region);
        self.schedule_repaint();
    }

    pub fn handle_native(&self, native: &NativeEvent, now_ms: f64) -> Vec<HostAction> {
        let actions = self.core.borrow_mut().handle_native(native, now_ms);
        self.schedule_repaint();
        actions
    }

    pub fn document_focus_changed(&self, focused: bool) {
        self.core.borrow_mut().document_focus_changed(focused);
        self.schedule_repaint();
    }

    /// Restart the resize debounce; windows are re-fitted once the viewport stops changing.
    pub fn viewport_resized(&self) {
        let weak = Rc::downgrade(&self.core);
        let scheduler = self.scheduler.clone();
        let timer = Rc::clone(&self.repaint_timer);
        let callback = Box::new(move || {
            let Some(core) = weak.upgrade() else {
                return;
            };
            core.borrow_mut().viewport_resized();
            arm_repaint(&core, &scheduler, &timer);
        });
        self.resize.borrow_mut().trigger(&self.scheduler, callback);
    }

    fn schedule_repaint(&self) {
        arm_repaint(&self.core, &self.scheduler, &self.repaint_timer);
    }
}

/// Start the flush timer if the core asked for one since the last flush.
fn arm_repaint<H, S>(core: &Rc<RefCell<ScreenCore<H>>>, scheduler: &S, timer: &Rc<RefCell<Option<S::Handle>>>)
where
    H: SurfaceHost + 'static,
    S: Scheduler,
{
    if !core.borrow_mut().take_repaint_request() {
        return;
    }
    let weak: Weak<RefCell<ScreenCore<H>>> = Rc::downgrade(core);
    let delay = core.borrow().config().repaint_delay_ms;
    let handle = scheduler.timeout(
        delay,
        Box::new(move || {
            if let Some(core) = weak.upgrade() {
                core.borrow_mut().flush_repaints();
            }
        }),
    );
    *timer.borrow_mut() = Some(handle);
}
