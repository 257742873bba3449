//! JSON file backed preferences.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Preferences, PreferencesError, PreferencesGateway};

/// File name used inside the application config directory.
const PREFERENCES_FILE: &str = "preferences.json";

/// Application directory name under the user's config directory.
const APP_DIR: &str = "pomodoro-timer";

/// Stores preferences as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonPreferencesStore {
    path: PathBuf,
}

impl JsonPreferencesStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the platform default location,
    /// e.g. `~/.config/pomodoro-timer/preferences.json` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`PreferencesError::NoConfigDir`] if the platform has no
    /// configuration directory for this user.
    pub fn default_location() -> Result<Self, PreferencesError> {
        let dir = dirs::config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(dir.join(APP_DIR).join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferencesGateway for JsonPreferencesStore {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = ?self.path, "No preferences file, using defaults");
                return Ok(Preferences::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut preferences: Preferences =
            serde_json::from_str(&text).map_err(|source| PreferencesError::Parse {
                path: self.path.clone(),
                source,
            })?;
        preferences.set_volume(preferences.volume);
        if !preferences.is_known_theme() {
            tracing::warn!(theme = %preferences.theme, "Unknown theme, using default");
            preferences.theme = Preferences::default().theme;
        }
        Ok(preferences)
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| self.io_error(std::io::Error::other(e)))?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = ?self.path, "Preferences saved");
        Ok(())
    }
}
