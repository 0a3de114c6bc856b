use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{CueError, CueResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Runtime options shared by cues, proxies and the undo history.
pub struct CueConfig {
    /// Maximum number of undo sets kept by [`crate::UndoHistory`].
    pub history_limit: usize,
    /// Absolute tolerance used when a diff removal is matched against queued
    /// command values. `0.0` requires exact equality.
    pub removal_tolerance: f64,
    /// Initial `enabled` flag of newly created cues.
    pub default_enabled: bool,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            removal_tolerance: 0.0,
            default_enabled: true,
        }
    }
}

impl CueConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(text: &str) -> CueResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| CueError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> CueResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CueError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| CueError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that cannot be honored.
    pub fn validate(&self) -> CueResult<()> {
        if self.history_limit == 0 {
            return Err(CueError::validation("history_limit must be > 0"));
        }
        if self.removal_tolerance.is_nan() || self.removal_tolerance < 0.0 {
            return Err(CueError::validation(
                "removal_tolerance must be a non-negative number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
