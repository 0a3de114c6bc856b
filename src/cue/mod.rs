//! The comparative cue: commands, their queue, typed events and the cue itself.

/// Command kinds and per-cell value rules.
pub mod command;
/// The comparative animation cue.
pub mod comparative;
/// Typed notifications and listener registry.
pub mod events;
/// Ordered command queue.
pub mod queue;
