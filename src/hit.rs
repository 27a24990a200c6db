#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::Point;
use crate::window::{Window, WindowId};

/// Find the window under `page_pt`.
///
/// `windows` is in ascending stacking order (last = topmost). A maximized
/// window covers the whole viewport and beats every non-maximized window.
/// Popups stacked above it are the one exception: they still win where
/// they cover the point, so menus opened from a maximized window stay
/// clickable. Returns `None` when nothing is hit.
#[must_use]
pub fn hit_test(page_pt: Point, windows: &[Window]) -> Option<WindowId> {
    let top_maximized = windows.iter().rposition(|w| w.maximized);

    if let Some(max_idx) = top_maximized {
        let popup_above = windows[max_idx + 1..]
            .iter()
            .rev()
            .find(|w| w.is_popup() && w.contains(page_pt));
        return Some(popup_above.map_or(windows[max_idx].id, |w| w.id));
    }

    windows.iter().rev().find(|w| w.contains(page_pt)).map(|w| w.id)
}
