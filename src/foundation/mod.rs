//! Shared building blocks: errors, configuration and the XML tree.

/// Runtime configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Owned XML element tree and number formatting.
pub mod xml;
