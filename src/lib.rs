//! Browser window screen: input routing and window surfaces for a retained-mode view tree.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It lets a
//! hierarchy of windows and views behave as if it owned its own display:
//! raw DOM pointer, touch, wheel and keyboard events are normalized and routed
//! to the right window, and each window paints into an offscreen canvas that
//! is blitted onto its visible canvas. The host JavaScript layer only has to
//! call [`dom::install`] and create windows.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level screen and testable [`engine::ScreenCore`] |
//! | [`router`] | Window stack, pointer capture, click counting, focus |
//! | [`normalize`] | Native event → canonical [`input::InputEvent`] |
//! | [`hit`] | Hit-testing against the window stack |
//! | [`input`] | Canonical input event types and pointer state |
//! | [`click`] | Multi-click tracking |
//! | [`window`] | Window data model |
//! | [`surface`] | Per-window chrome element, canvas pair, modal wait |
//! | [`paint`] | Painter trait, immediate and deferred painters |
//! | [`shape`] | Vector shapes and path segments |
//! | [`geom`] | Points, rects, transforms, content view |
//! | [`view`] | The view-tree seam windows deliver to |
//! | [`schedule`] | Timers, repaint coalescing, resize debounce |
//! | [`dom`] | `web_sys` backends for everything above |
//! | [`config`] | Screen configuration |
//! | [`capability`] | Device capabilities (scale, touch, pointer capture) |
//! | [`error`] | Error types |
//! | [`consts`] | Shared constants (click interval, epsilon, key codes) |

pub mod capability;
pub mod click;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod normalize;
pub mod paint;
pub mod router;
pub mod schedule;
pub mod shape;
pub mod surface;
pub mod view;
pub mod window;

#[cfg(test)]
mod testing;
