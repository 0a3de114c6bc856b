//! Undo elements, the undo history and proxy lookup for replay.

/// Before/after snapshot element for comparative cues.
pub mod element;
/// Proxy lookup by stable id.
pub mod locator;
/// Undo stack trait and bounded history.
pub mod stack;
