//! Window data model shared by the router and window surfaces.

#[cfg(test)]
#[path = "window_test.rs"]
mod window_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{ContentView, Point, Rect};

/// Unique identifier for a window.
pub type WindowId = Uuid;

/// How a window behaves when shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// Ordinary top-level window.
    #[default]
    Normal,
    /// Blocks the flow that showed it until it is hidden.
    Modal,
    /// Transient window (menu, tooltip); never becomes the main window.
    Popup,
}

/// Effective display mode of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    Normal,
    Maximized,
    Modal,
    Popup,
}

/// A logical window: geometry, stacking, mode and visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Unique identifier for this window.
    pub id: WindowId,
    /// Id of the DOM element to host the window in, if any.
    pub name: Option<String>,
    /// Bounds in page coordinates (logical pixels).
    pub bounds: Rect,
    /// Stacking value; larger is closer to the viewer.
    pub z_index: u64,
    /// Normal, modal or popup.
    pub kind: WindowKind,
    /// Whether the window fills the viewport.
    pub maximized: bool,
    /// Whether the window is currently showing.
    pub visible: bool,
    /// Whether the window has keyboard focus.
    pub focused: bool,
    /// Scroll/zoom of the window's content.
    pub content: ContentView,
}

impl Window {
    /// A hidden, unfocused window with the given bounds.
    #[must_use]
    pub fn new(kind: WindowKind, bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            bounds,
            z_index: 0,
            kind,
            maximized: false,
            visible: false,
            focused: false,
            content: ContentView::default(),
        }
    }

    /// Builder-style: host the window inside the DOM element with this id.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Effective mode; maximization wins over the window kind.
    #[must_use]
    pub fn mode(&self) -> WindowMode {
        if self.maximized {
            return WindowMode::Maximized;
        }
        match self.kind {
            WindowKind::Normal => WindowMode::Normal,
            WindowKind::Modal => WindowMode::Modal,
            WindowKind::Popup => WindowMode::Popup,
        }
    }

    #[must_use]
    pub fn is_popup(&self) -> bool {
        self.kind == WindowKind::Popup
    }

    #[must_use]
    pub fn is_modal(&self) -> bool {
        self.kind == WindowKind::Modal
    }

    /// Whether a page point falls inside this window's declared bounds.
    #[must_use]
    pub fn contains(&self, page_pt: Point) -> bool {
        self.bounds.contains(page_pt)
    }
}
