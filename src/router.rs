//! Screen router: the window stack and the pointer state machine.
//!
//! The router owns the ordered list of showing windows (ascending stacking
//! order, last = topmost) and turns each [`NativeEvent`] into zero or more
//! [`Action`]s for the host to carry out. It never touches the DOM, so it can
//! be driven directly from tests.
//!
//! Pointer handling follows `Idle → Pressed → Dragging → Idle`:
//! a press hit-tests and captures the hit window; moves while captured are
//! delivered as drags to that window without re-hit-testing; the release goes
//! to the captured window and ends the gesture. Keys go to the main window
//! while it has focus; wheel events are hit-tested every time.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use crate::click::ClickTracker;
use crate::consts::CLICK_INTERVAL_MS;
use crate::hit::hit_test;
use crate::input::{EventKind, InputEvent, PointerState};
use crate::normalize::{KeyPhase, NativeEvent, PointerPhase, TouchPhase, normalize, typed_char};
use crate::window::{Window, WindowId};

/// Actions returned from [`ScreenRouter::handle`] for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Deliver a canonical event to the view tree of `event.window()`.
    Deliver(InputEvent),
    /// A window gained or lost keyboard focus.
    Focus { window: WindowId, focused: bool },
    /// Capture the given pointer on the screen element so drags outside the page keep arriving.
    CapturePointer { pointer_id: i32 },
    /// The touch event was consumed by a window; suppress scrolling and emulated mouse events.
    PreventDefault,
}

/// Routes normalized input to windows. One instance per screen.
#[derive(Debug, Clone)]
pub struct ScreenRouter {
    windows: Vec<Window>,
    main_window: Option<WindowId>,
    pointer: PointerState,
    clicks: ClickTracker,
    pointer_capture: bool,
    next_z: u64,
}

impl Default for ScreenRouter {
    fn default() -> Self {
        Self::new(CLICK_INTERVAL_MS, true)
    }
}

impl ScreenRouter {
    /// A router with an empty window stack.
    ///
    /// `pointer_capture` says whether the device supports capturing a pointer
    /// on the screen element.
    #[must_use]
    pub fn new(click_interval_ms: f64, pointer_capture: bool) -> Self {
        Self {
            windows: Vec::new(),
            main_window: None,
            pointer: PointerState::Idle,
            clicks: ClickTracker::new(click_interval_ms),
            pointer_capture,
            next_z: 1,
        }
    }

    // --- Window list ---

    /// Showing windows in ascending stacking order.
    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    #[must_use]
    pub fn window(&self, id: &WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == *id)
    }

    /// The most recently added non-popup window; the keyboard target.
    #[must_use]
    pub fn main_window(&self) -> Option<WindowId> {
        self.main_window
    }

    /// Add a window on top of the stack and return its stacking value.
    ///
    /// A window already in the list is moved to the top instead of duplicated.
    pub fn add_window(&mut self, mut window: Window) -> u64 {
        self.windows.retain(|w| w.id != window.id);
        window.z_index = self.next_z();
        let z = window.z_index;
        if !window.is_popup() {
            self.main_window = Some(window.id);
        }
        self.windows.push(window);
        z
    }

    /// Remove a window from the stack.
    ///
    /// The main window falls back to the topmost remaining non-popup window,
    /// and a gesture captured by the removed window is abandoned.
    pub fn remove_window(&mut self, id: &WindowId) -> Option<Window> {
        let idx = self.windows.iter().position(|w| w.id == *id)?;
        let removed = self.windows.remove(idx);
        self.main_window = self.windows.iter().rev().find(|w| !w.is_popup()).map(|w| w.id);
        if self.pointer.captured() == Some(*id) {
            log::debug!("window {id} removed mid-gesture; releasing capture");
            self.pointer = PointerState::Idle;
        }
        Some(removed)
    }

    /// Move a window to the top of the stack and give it a new stacking value.
    pub fn to_front(&mut self, id: &WindowId) -> Option<u64> {
        let idx = self.windows.iter().position(|w| w.id == *id)?;
        let mut window = self.windows.remove(idx);
        window.z_index = self.next_z();
        let z = window.z_index;
        self.windows.push(window);
        Some(z)
    }

    /// Replace the router's copy of a showing window (bounds, mode, content view).
    ///
    /// The stacking position is kept. Unknown windows are ignored.
    pub fn sync_window(&mut self, window: &Window) {
        if let Some(slot) = self.windows.iter_mut().find(|w| w.id == window.id) {
            let z = slot.z_index;
            *slot = window.clone();
            slot.z_index = z;
        }
    }

    /// Next value of the monotonically increasing stacking counter.
    pub fn next_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    // --- Queries ---

    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.clicks.count()
    }

    /// The window keyboard events go to right now, if any.
    #[must_use]
    pub fn focused_window(&self) -> Option<WindowId> {
        let id = self.main_window?;
        self.window(&id).filter(|w| w.focused).map(|w| w.id)
    }

    // --- Events ---

    /// Route one native event. `now_ms` is the event timestamp used for click counting.
    pub fn handle(&mut self, native: &NativeEvent, now_ms: f64) -> Vec<Action> {
        match native {
            NativeEvent::Mouse { phase: PointerPhase::Down, .. } => self.press(native, now_ms),
            NativeEvent::Mouse { phase: PointerPhase::Move, .. } => self.pointer_moved(native),
            NativeEvent::Mouse { phase: PointerPhase::Up, .. } => self.release(native),
            NativeEvent::Touch { phase, .. } => self.touch(native, *phase, now_ms),
            NativeEvent::Wheel { .. } => self.wheel(native),
            NativeEvent::Key { phase, key, .. } => self.key(native, *phase, key),
            NativeEvent::PointerDown { pointer_id } => {
                if self.pointer_capture {
                    vec![Action::CapturePointer { pointer_id: *pointer_id }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// The browser document gained or lost focus; every window follows.
    pub fn document_focus_changed(&mut self, focused: bool) -> Vec<Action> {
        self.windows
            .iter_mut()
            .map(|w| {
                w.focused = focused;
                Action::Focus { window: w.id, focused }
            })
            .collect()
    }

    fn press(&mut self, native: &NativeEvent, now_ms: f64) -> Vec<Action> {
        let Some(sample) = native.sample() else {
            return Vec::new();
        };
        let Some(target) = hit_test(sample.page, &self.windows) else {
            return Vec::new();
        };
        let clicks = self.clicks.register(now_ms);
        self.pointer = PointerState::Pressed { window: target };
        self.deliver(native, EventKind::Press, target, clicks)
    }

    /// Touches run the same machine as the mouse. Every touch event that
    /// belongs to a gesture on a window also yields [`Action::PreventDefault`].
    fn touch(&mut self, native: &NativeEvent, phase: TouchPhase, now_ms: f64) -> Vec<Action> {
        let was_captured = self.pointer.captured().is_some();
        let mut actions = match phase {
            TouchPhase::Start => self.press(native, now_ms),
            // Touches have no hover: a move without a captured press is dropped.
            TouchPhase::Move if !was_captured => return Vec::new(),
            TouchPhase::Move => self.pointer_moved(native),
            TouchPhase::End => self.release(native),
        };
        let consumed = match phase {
            TouchPhase::Start => !actions.is_empty(),
            TouchPhase::Move | TouchPhase::End => was_captured,
        };
        if consumed {
            actions.push(Action::PreventDefault);
        }
        actions
    }

    fn pointer_moved(&mut self, native: &NativeEvent) -> Vec<Action> {
        let clicks = self.clicks.count();
        if let Some(captured) = self.pointer.captured() {
            self.pointer = PointerState::Dragging { window: captured };
            return self.deliver(native, EventKind::Drag, captured, clicks);
        }
        let Some(sample) = native.sample() else {
            return Vec::new();
        };
        let Some(target) = hit_test(sample.page, &self.windows).or(self.main_window) else {
            return Vec::new();
        };
        self.deliver(native, EventKind::Move, target, clicks)
    }

    fn release(&mut self, native: &NativeEvent) -> Vec<Action> {
        let Some(captured) = self.pointer.captured() else {
            return Vec::new();
        };
        self.pointer = PointerState::Idle;
        self.deliver(native, EventKind::Release, captured, self.clicks.count())
    }

    fn wheel(&mut self, native: &NativeEvent) -> Vec<Action> {
        let Some(sample) = native.sample() else {
            return Vec::new();
        };
        let Some(target) = hit_test(sample.page, &self.windows).or(self.main_window) else {
            return Vec::new();
        };
        self.deliver(native, EventKind::Wheel, target, 0)
    }

    fn key(&mut self, native: &NativeEvent, phase: KeyPhase, key: &str) -> Vec<Action> {
        let Some(target) = self.focused_window() else {
            log::debug!("key event dropped: no focused window");
            return Vec::new();
        };
        match phase {
            KeyPhase::Up => self.deliver(native, EventKind::KeyUp, target, 0),
            KeyPhase::Down => {
                let Some(down) = self.event(native, EventKind::KeyDown, target, 0) else {
                    return Vec::new();
                };
                let typed = typed_char(key).is_some().then(|| down.derive(EventKind::KeyType));
                std::iter::once(down).chain(typed).map(Action::Deliver).collect()
            }
        }
    }

    fn deliver(&self, native: &NativeEvent, kind: EventKind, target: WindowId, clicks: u32) -> Vec<Action> {
        self.event(native, kind, target, clicks).map(Action::Deliver).into_iter().collect()
    }

    fn event(&self, native: &NativeEvent, kind: EventKind, target: WindowId, clicks: u32) -> Option<InputEvent> {
        let Some(window) = self.window(&target) else {
            log::debug!("{kind:?} for missing window {target} dropped");
            return None;
        };
        normalize(native, kind, window).map(|event| event.with_click_count(clicks))
    }
}
