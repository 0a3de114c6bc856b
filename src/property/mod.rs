//! Collaborators that receive resolved cue values.

/// In-memory properties, domains and proxies.
pub mod memory;
/// Collaborator traits and the push target shared by all cues.
pub mod target;
