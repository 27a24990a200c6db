//! Input model: canonical events, modifier keys, mouse buttons, and pointer state.
//!
//! This module defines the one event shape the rest of the crate consumes.
//! Mouse and touch both become [`EventKind::Press`] / [`EventKind::Drag`] /
//! [`EventKind::Release`]; wheel and keyboard events carry their own payloads.
//! `PointerState` is the per-pointer gesture tracked by the router between a
//! press and its release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geom::Point;
use crate::window::WindowId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the platform shortcut key (Meta or Ctrl) is held.
    #[must_use]
    pub fn shortcut(self) -> bool {
        self.meta || self.ctrl
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button; the popup trigger.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Keyboard payload of a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Canonical key code (see [`crate::normalize::canonical_key_code`]).
    pub code: u32,
    /// The typed character for single-character keys, `None` for named keys like `"Enter"`.
    pub ch: Option<char>,
}

/// What kind of canonical event this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Press,
    Move,
    Drag,
    Release,
    Wheel,
    KeyDown,
    KeyUp,
    KeyType,
}

impl EventKind {
    /// Whether this kind carries pointer geometry.
    #[must_use]
    pub fn is_pointer(self) -> bool {
        matches!(self, Self::Press | Self::Move | Self::Drag | Self::Release | Self::Wheel)
    }

    /// Whether this kind is a keyboard event.
    #[must_use]
    pub fn is_key(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp | Self::KeyType)
    }
}

/// A normalized, window-targeted input event. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    kind: EventKind,
    window: WindowId,
    point: Point,
    modifiers: Modifiers,
    button: Button,
    click_count: u32,
    wheel: WheelDelta,
    key: Option<KeyInfo>,
}

impl InputEvent {
    /// A pointer event (press, move, drag, release) at a window-local point.
    #[must_use]
    pub fn pointer(kind: EventKind, window: WindowId, point: Point, modifiers: Modifiers, button: Button) -> Self {
        Self {
            kind,
            window,
            point,
            modifiers,
            button,
            click_count: 0,
            wheel: WheelDelta::default(),
            key: None,
        }
    }

    /// A wheel event at a window-local point.
    #[must_use]
    pub fn wheel(window: WindowId, point: Point, modifiers: Modifiers, delta: WheelDelta) -> Self {
        Self { wheel: delta, ..Self::pointer(EventKind::Wheel, window, point, modifiers, Button::Primary) }
    }

    /// A keyboard event. Key events carry no geometry.
    #[must_use]
    pub fn key(kind: EventKind, window: WindowId, key: KeyInfo, modifiers: Modifiers) -> Self {
        Self { key: Some(key), ..Self::pointer(kind, window, Point::default(), modifiers, Button::Primary) }
    }

    /// Copy of this event with the given click count.
    #[must_use]
    pub fn with_click_count(self, click_count: u32) -> Self {
        Self { click_count, ..self }
    }

    /// Copy of this event as a different kind, keeping point, modifiers and click count.
    #[must_use]
    pub fn derive(&self, kind: EventKind) -> Self {
        Self { kind, ..self.clone() }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Point in the window's content coordinates.
    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub fn button(&self) -> Button {
        self.button
    }

    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    #[must_use]
    pub fn wheel_delta(&self) -> WheelDelta {
        self.wheel
    }

    #[must_use]
    pub fn key_info(&self) -> Option<&KeyInfo> {
        self.key.as_ref()
    }

    /// Whether this is a secondary-button press (context menu).
    #[must_use]
    pub fn is_popup_trigger(&self) -> bool {
        self.kind == EventKind::Press && self.button == Button::Secondary
    }
}

/// Gesture state for the single physical pointer.
///
/// `Pressed` and `Dragging` carry the window captured at press time; every
/// move or release until the gesture ends goes to that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    /// No gesture in progress; waiting for the next press.
    #[default]
    Idle,
    /// A press landed on `window` and no move has followed yet.
    Pressed {
        /// The captured window.
        window: WindowId,
    },
    /// The pointer has moved since the press.
    Dragging {
        /// The captured window.
        window: WindowId,
    },
}

impl PointerState {
    /// The window capturing the pointer, if a gesture is in progress.
    #[must_use]
    pub fn captured(self) -> Option<WindowId> {
        match self {
            Self::Idle => None,
            Self::Pressed { window } | Self::Dragging { window } => Some(window),
        }
    }
}
