//! Shared numeric constants for the screen crate.

// ── Input ───────────────────────────────────────────────────────

/// Maximum gap between successive presses, in milliseconds, for them to count as a multi-click.
pub const CLICK_INTERVAL_MS: f64 = 400.0;

/// Canonical key code for Enter.
pub const KEY_ENTER: u32 = 10;

/// Canonical key code for the Command / Meta key.
pub const KEY_COMMAND: u32 = 157;

// ── Painting ────────────────────────────────────────────────────

/// Tolerance for treating two paint-state scalars (opacity, image quality) as equal.
pub const PAINT_EPSILON: f64 = 1e-5;

/// Image quality above which smoothing is `high`.
pub const IMAGE_QUALITY_HIGH: f64 = 0.67;

/// Image quality above which smoothing is `medium` (and enabled at all).
pub const IMAGE_QUALITY_MEDIUM: f64 = 0.33;

// ── Windows ─────────────────────────────────────────────────────

/// Default padding around a maximized window's canvas, in CSS pixels.
pub const MAXIMIZED_PADDING_PX: f64 = 5.0;

/// Default debounce for viewport resize notifications, in milliseconds.
pub const RESIZE_DEBOUNCE_MS: u32 = 100;
