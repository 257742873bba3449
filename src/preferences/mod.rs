//! User preferences for the Pomodoro Timer front end.
//!
//! Preferences are presentation settings only (theme, volume, language). They
//! never affect timing. Loading and saving go through a [`PreferencesGateway`]
//! so the engine never touches a well-known file path itself.

mod error;
mod store;

use serde::{Deserialize, Serialize};

pub use error::PreferencesError;
pub use store::JsonPreferencesStore;

/// Themes offered by the front end.
pub const THEMES: [&str; 5] = ["darkly", "superhero", "solar", "cyborg", "vapor"];

fn default_theme() -> String {
    "darkly".to_string()
}

fn default_volume() -> u8 {
    50
}

fn default_language() -> String {
    "en".to_string()
}

/// Presentation preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Colour theme name
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Alert volume, 0-100
    #[serde(default = "default_volume")]
    pub volume: u8,
    /// Language tag for display text
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            volume: default_volume(),
            language: default_language(),
        }
    }
}

impl Preferences {
    /// Sets the volume, clamped to 0-100.
    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    /// Returns true if alerts should be silent.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.volume == 0
    }

    /// Returns true if the theme is one the front end knows.
    #[must_use]
    pub fn is_known_theme(&self) -> bool {
        THEMES.contains(&self.theme.as_str())
    }
}

/// Loads and saves [`Preferences`].
pub trait PreferencesGateway {
    /// Loads preferences, returning defaults when none were saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if stored preferences exist but cannot be read.
    fn load(&self) -> Result<Preferences, PreferencesError>;

    /// Persists preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError>;
}
