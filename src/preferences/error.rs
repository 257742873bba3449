//! Preferences error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// The preferences file could not be read or written.
    #[error("Preferences I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preferences file is not valid JSON for [`Preferences`](super::Preferences).
    #[error("Malformed preferences file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No configuration directory could be determined for this user.
    #[error("No configuration directory available")]
    NoConfigDir,
}

impl PreferencesError {
    /// Returns true if falling back to default preferences is reasonable.
    #[must_use]
    pub fn should_use_defaults(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::NoConfigDir)
    }
}
