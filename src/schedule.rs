//! Timers, repaint coalescing and resize debouncing.
//!
//! All work runs on the host's single event-loop thread. A timer is cancelled
//! by dropping the handle its scheduler returned; a cancelled timer never runs.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::collections::HashMap;

use crate::geom::Rect;
use crate::window::WindowId;

/// Source of fire-once and repeating timers.
pub trait Scheduler {
    /// Registration token; dropping it cancels the timer.
    type Handle;

    /// Run `callback` once after `delay_ms`.
    fn timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Handle;

    /// Run `callback` every `period_ms` until the handle is dropped.
    fn interval(&self, period_ms: u32, callback: Box<dyn FnMut()>) -> Self::Handle;
}

/// Damaged regions waiting to be repainted, unioned per window.
#[derive(Debug, Default)]
pub struct RepaintQueue {
    pending: HashMap<WindowId, Rect>,
    order: Vec<WindowId>,
    scheduled: bool,
}

impl RepaintQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a damaged region for `window`.
    ///
    /// Returns `true` when the caller must schedule a flush: the first request
    /// after the previous drain.
    pub fn request(&mut self, window: WindowId, region: Rect) -> bool {
        if region.is_empty() {
            return false;
        }
        match self.pending.get_mut(&window) {
            Some(existing) => *existing = existing.union(&region),
            None => {
                self.pending.insert(window, region);
                self.order.push(window);
            }
        }
        let schedule = !self.scheduled;
        self.scheduled = true;
        schedule
    }

    /// Forget pending damage for a window that went away.
    pub fn cancel(&mut self, window: &WindowId) {
        if self.pending.remove(window).is_some() {
            self.order.retain(|id| id != window);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn pending(&self, window: &WindowId) -> Option<Rect> {
        self.pending.get(window).copied()
    }

    /// Take every pending region, in first-request order, and allow the next flush to be scheduled.
    pub fn drain(&mut self) -> Vec<(WindowId, Rect)> {
        self.scheduled = false;
        let mut pending = std::mem::take(&mut self.pending);
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|id| pending.remove(&id).map(|r| (id, r)))
            .collect()
    }
}

/// Holds at most one pending timer; arming it again replaces (cancels) the previous one.
pub struct Debouncer<S: Scheduler> {
    delay_ms: u32,
    pending: Option<S::Handle>,
}

impl<S: Scheduler> Debouncer<S> {
    #[must_use]
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms, pending: None }
    }

    /// Restart the quiet period; `callback` runs once it elapses with no further calls.
    pub fn trigger(&mut self, scheduler: &S, callback: Box<dyn FnOnce()>) {
        self.pending = Some(scheduler.timeout(self.delay_ms, callback));
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
