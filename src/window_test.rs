use super::*;

#[test]
fn new_window_is_hidden_and_unfocused() {
    let win = Window::new(WindowKind::Normal, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(!win.visible);
    assert!(!win.focused);
    assert!(!win.maximized);
    assert_eq!(win.z_index, 0);
    assert!(win.name.is_none());
}

#[test]
fn new_windows_get_distinct_ids() {
    let a = Window::new(WindowKind::Normal, Rect::default());
    let b = Window::new(WindowKind::Normal, Rect::default());
    assert_ne!(a.id, b.id);
}

#[test]
fn mode_follows_kind() {
    assert_eq!(Window::new(WindowKind::Normal, Rect::default()).mode(), WindowMode::Normal);
    assert_eq!(Window::new(WindowKind::Modal, Rect::default()).mode(), WindowMode::Modal);
    assert_eq!(Window::new(WindowKind::Popup, Rect::default()).mode(), WindowMode::Popup);
}

#[test]
fn maximized_wins_over_kind() {
    let mut win = Window::new(WindowKind::Modal, Rect::default());
    win.maximized = true;
    assert_eq!(win.mode(), WindowMode::Maximized);
    assert!(win.is_modal());
}

#[test]
fn named_sets_container() {
    let win = Window::new(WindowKind::Normal, Rect::default()).named("app");
    assert_eq!(win.name.as_deref(), Some("app"));
}

#[test]
fn contains_uses_page_bounds() {
    let win = Window::new(WindowKind::Normal, Rect::new(100.0, 50.0, 200.0, 100.0));
    assert!(win.contains(Point::new(150.0, 60.0)));
    assert!(!win.contains(Point::new(50.0, 60.0)));
}

#[test]
fn mode_serializes_lowercase() {
    let json = serde_json::to_string(&WindowMode::Maximized).expect("serialize");
    assert_eq!(json, "\"maximized\"");
}
