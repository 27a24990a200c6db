//! Device capabilities: the one place platform differences are described.

#[cfg(test)]
#[path = "capability_test.rs"]
mod capability_test;

/// What the display and input hardware support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Backing-store pixels per logical pixel. Always at least 1.
    pub scale_factor: u32,
    /// Whether touch events are delivered.
    pub touch: bool,
    /// Whether a pointer can be captured by an element.
    pub pointer_capture: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self { scale_factor: 1, touch: false, pointer_capture: true }
    }
}

impl DeviceCapabilities {
    /// Capabilities for a display with the given device pixel ratio.
    #[must_use]
    pub fn from_pixel_ratio(dpr: f64, touch: bool, pointer_capture: bool) -> Self {
        Self { scale_factor: scale_for_ratio(dpr), touch, pointer_capture }
    }

    /// Replace the detected scale with `scale`, if given.
    #[must_use]
    pub fn with_scale_override(self, scale: Option<u32>) -> Self {
        match scale {
            Some(s) => Self { scale_factor: s.max(1), ..self },
            None => self,
        }
    }

    /// Scale factor as a float, for geometry.
    #[must_use]
    pub fn scale(&self) -> f64 {
        f64::from(self.scale_factor)
    }
}

/// Integer device scale for a pixel ratio: rounded, never below 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_for_ratio(dpr: f64) -> u32 {
    if !dpr.is_finite() || dpr < 1.0 {
        return 1;
    }
    dpr.round() as u32
}
