//! Error types for the screen crate.

use crate::window::WindowId;

/// Errors raised while wiring windows into the page.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// A DOM call failed; the payload is the stringified JS exception.
    #[error("dom operation failed: {0}")]
    Dom(String),
    /// A canvas refused to hand out a 2D rendering context.
    #[error("canvas has no 2d context")]
    MissingContext,
    /// No window is registered under the given id.
    #[error("unknown window: {0}")]
    UnknownWindow(WindowId),
    /// The configuration JSON could not be parsed.
    #[error("invalid screen config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors raised by painters and the canvas context seam.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    /// `restore` was called with no matching `save`.
    #[error("restore without matching save")]
    UnbalancedRestore,
    /// A deferred batch was flushed with saves still open.
    #[error("flush with {0} unmatched save(s)")]
    UnclosedSave(usize),
    /// A canvas call failed; the payload is the stringified JS exception.
    #[error("canvas call failed: {0}")]
    Context(String),
    /// A deferred batch ran out of operands for an opcode.
    #[error("deferred batch is missing operands for {0}")]
    MalformedBatch(&'static str),
}
