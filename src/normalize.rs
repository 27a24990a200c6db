//! Event normalization: platform-native input → canonical [`InputEvent`].
//!
//! [`NativeEvent`] is a plain-data mirror of the DOM event fields this crate
//! reads (built by [`crate::dom`] in the browser, or directly in tests).
//! Mouse and touch are normalized identically: page coordinates (client
//! coordinates for a maximized window) are rounded, made window-local by
//! subtracting the window origin, then mapped through the window's content
//! view. Modifier flags are copied, never inferred.

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;

use crate::consts::{KEY_COMMAND, KEY_ENTER};
use crate::geom::Point;
use crate::input::{Button, EventKind, InputEvent, KeyInfo, Modifiers, WheelDelta};
use crate::window::Window;

/// One pointer position as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Position relative to the document (includes page scroll).
    pub page: Point,
    /// Position relative to the viewport.
    pub client: Point,
}

impl PointerSample {
    #[must_use]
    pub fn new(page: Point, client: Point) -> Self {
        Self { page, client }
    }

    /// A sample with no page scroll (page == client).
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), Point::new(x, y))
    }
}

/// Phase of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Phase of a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// A platform input event, reduced to the fields the router reads.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    /// `mousedown` / `mousemove` / `mouseup`.
    Mouse { phase: PointerPhase, sample: PointerSample, button: Button, modifiers: Modifiers },
    /// `touchstart` / `touchmove` / `touchend`; only the first touch is used.
    Touch { phase: TouchPhase, touches: Vec<PointerSample>, modifiers: Modifiers },
    /// `wheel`.
    Wheel { sample: PointerSample, delta: WheelDelta, modifiers: Modifiers },
    /// `keydown` / `keyup`. `key_code` is the raw platform code, `key` the DOM key string.
    Key { phase: KeyPhase, key_code: u32, key: String, modifiers: Modifiers },
    /// `pointerdown`: the pointer should be captured by the screen element.
    PointerDown { pointer_id: i32 },
}

impl NativeEvent {
    /// The pointer position this event carries, if any. Touch events use their first touch.
    #[must_use]
    pub fn sample(&self) -> Option<PointerSample> {
        match self {
            Self::Mouse { sample, .. } | Self::Wheel { sample, .. } => Some(*sample),
            Self::Touch { touches, .. } => touches.first().copied(),
            Self::Key { .. } | Self::PointerDown { .. } => None,
        }
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Mouse { modifiers, .. }
            | Self::Touch { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::Key { modifiers, .. } => *modifiers,
            Self::PointerDown { .. } => Modifiers::default(),
        }
    }
}

/// Map a raw platform key code into the canonical table; unknown codes pass through.
#[must_use]
pub fn canonical_key_code(raw: u32) -> u32 {
    match raw {
        13 => KEY_ENTER,
        91 | 93 | 224 => KEY_COMMAND,
        other => other,
    }
}

/// The typed character of a DOM key string; named keys (`"Enter"`, `"Shift"`) have none.
#[must_use]
pub fn typed_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Convert a page-space pointer sample into `window`'s content coordinates.
#[must_use]
pub fn window_point(sample: PointerSample, window: &Window) -> Point {
    // A maximized window is fixed to the viewport, so page scroll must not count.
    let raw = if window.maximized { sample.client } else { sample.page }.round();
    let local = Point::new(raw.x - window.bounds.x, raw.y - window.bounds.y);
    window.content.local_to_content(local)
}

/// Build the canonical event of `kind` for `native`, targeted at `window`.
///
/// Returns `None` when the native event has nothing to offer for that kind:
/// a pointer kind without geometry (e.g. a touch list with no touches), or a
/// key kind from a non-keyboard event.
#[must_use]
pub fn normalize(native: &NativeEvent, kind: EventKind, window: &Window) -> Option<InputEvent> {
    let modifiers = native.modifiers();
    match native {
        NativeEvent::Key { key_code, key, .. } if kind.is_key() => {
            let info = KeyInfo { code: canonical_key_code(*key_code), ch: typed_char(key) };
            Some(InputEvent::key(kind, window.id, info, modifiers))
        }
        NativeEvent::Wheel { sample, delta, .. } if kind == EventKind::Wheel => {
            Some(InputEvent::wheel(window.id, window_point(*sample, window), modifiers, *delta))
        }
        NativeEvent::Mouse { sample, button, .. } if kind.is_pointer() => {
            Some(InputEvent::pointer(kind, window.id, window_point(*sample, window), modifiers, *button))
        }
        NativeEvent::Touch { .. } if kind.is_pointer() => {
            let sample = native.sample()?;
            Some(InputEvent::pointer(kind, window.id, window_point(sample, window), modifiers, Button::Primary))
        }
        _ => None,
    }
}
