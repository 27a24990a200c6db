//! Multi-click tracking for the single physical pointer.

#[cfg(test)]
#[path = "click_test.rs"]
mod click_test;

use crate::consts::CLICK_INTERVAL_MS;

/// Running click count shared by every window.
///
/// Each registered click within `interval_ms` of the previous one bumps the
/// count; a longer gap resets it to 1.
#[derive(Debug, Clone, Copy)]
pub struct ClickTracker {
    interval_ms: f64,
    last_ms: Option<f64>,
    count: u32,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(CLICK_INTERVAL_MS)
    }
}

impl ClickTracker {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last_ms: None, count: 0 }
    }

    /// Record a click at `now_ms` and return the updated count.
    pub fn register(&mut self, now_ms: f64) -> u32 {
        self.count = match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => self.count + 1,
            _ => 1,
        };
        self.last_ms = Some(now_ms);
        self.count
    }

    /// The current count (0 before the first click).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}
