use uuid::Uuid;

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn modifiers_shortcut_is_meta_or_ctrl() {
    assert!(Modifiers { meta: true, ..Default::default() }.shortcut());
    assert!(Modifiers { ctrl: true, ..Default::default() }.shortcut());
    assert!(!Modifiers { shift: true, alt: true, ..Default::default() }.shortcut());
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_from_dom_codes() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
    assert_eq!(Button::from_dom(4), Button::Primary);
}

// =============================================================
// EventKind
// =============================================================

#[test]
fn event_kind_classification() {
    assert!(EventKind::Drag.is_pointer());
    assert!(EventKind::Wheel.is_pointer());
    assert!(!EventKind::KeyType.is_pointer());
    assert!(EventKind::KeyUp.is_key());
    assert!(!EventKind::Press.is_key());
}

// =============================================================
// InputEvent
// =============================================================

#[test]
fn pointer_event_starts_with_zero_clicks() {
    let ev = InputEvent::pointer(EventKind::Press, Uuid::new_v4(), Point::new(1.0, 2.0), Modifiers::default(), Button::Primary);
    assert_eq!(ev.click_count(), 0);
    assert!(ev.key_info().is_none());
}

#[test]
fn with_click_count_keeps_other_fields() {
    let win = Uuid::new_v4();
    let ev = InputEvent::pointer(EventKind::Press, win, Point::new(3.0, 4.0), Modifiers::default(), Button::Primary)
        .with_click_count(2);
    assert_eq!(ev.click_count(), 2);
    assert_eq!(ev.window(), win);
    assert_eq!(ev.point(), Point::new(3.0, 4.0));
}

#[test]
fn derived_event_copies_click_count() {
    let press = InputEvent::pointer(EventKind::Press, Uuid::new_v4(), Point::new(0.0, 0.0), Modifiers::default(), Button::Primary)
        .with_click_count(3);
    let drag = press.derive(EventKind::Drag);
    assert_eq!(drag.kind(), EventKind::Drag);
    assert_eq!(drag.click_count(), 3);
}

#[test]
fn wheel_event_carries_delta() {
    let ev = InputEvent::wheel(Uuid::new_v4(), Point::default(), Modifiers::default(), WheelDelta { dx: 0.0, dy: 12.0 });
    assert_eq!(ev.kind(), EventKind::Wheel);
    assert_eq!(ev.wheel_delta(), WheelDelta { dx: 0.0, dy: 12.0 });
}

#[test]
fn key_event_carries_key_info() {
    let key = KeyInfo { code: 65, ch: Some('a') };
    let ev = InputEvent::key(EventKind::KeyDown, Uuid::new_v4(), key.clone(), Modifiers::default());
    assert_eq!(ev.key_info(), Some(&key));
}

#[test]
fn popup_trigger_is_secondary_press() {
    let win = Uuid::new_v4();
    let press = InputEvent::pointer(EventKind::Press, win, Point::default(), Modifiers::default(), Button::Secondary);
    assert!(press.is_popup_trigger());
    assert!(!press.derive(EventKind::Release).is_popup_trigger());
}

// =============================================================
// PointerState
// =============================================================

#[test]
fn pointer_state_default_is_idle() {
    assert_eq!(PointerState::default(), PointerState::Idle);
    assert!(PointerState::Idle.captured().is_none());
}

#[test]
fn pointer_state_captured_window() {
    let win = Uuid::new_v4();
    assert_eq!(PointerState::Pressed { window: win }.captured(), Some(win));
    assert_eq!(PointerState::Dragging { window: win }.captured(), Some(win));
}
