//! The seam between a window and the view tree it hosts.
//!
//! Widget layout and application logic live above this trait. A window
//! delivers routed events to its [`View`], asks it to paint damaged regions,
//! and tells it about focus changes and closing. The view answers with
//! [`ViewRequest`]s that the screen carries out after the call returns, so a
//! view never needs a reference back to its window.

use crate::geom::Rect;
use crate::input::InputEvent;
use crate::paint::Painter;
use crate::surface::Cursor;

/// Something a view asks its window to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    /// Repaint this region (window-local logical pixels).
    Repaint(Rect),
    /// Repaint the whole window.
    RepaintAll,
    /// Bring the window to the front.
    ToFront,
    /// Hide the window.
    Close,
    SetCursor(Cursor),
    /// Move or resize the window (page coordinates).
    SetBounds(Rect),
    SetMaximized(bool),
}

/// Root of a window's view tree.
pub trait View {
    /// Handle an input event routed to this window.
    fn handle_event(&mut self, event: &InputEvent) -> Vec<ViewRequest>;

    /// Paint `region` (window-local) with `painter`. Drawing outside `region` is clipped.
    fn paint(&mut self, painter: &mut dyn Painter, region: Rect);

    fn focus_changed(&mut self, _focused: bool) {}

    /// The window was hidden.
    fn window_closed(&mut self) {}
}
