//! `prefs` subcommand handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::preferences::{JsonPreferencesStore, Preferences, PreferencesGateway};

use super::commands::PrefsAction;
use super::display::Display;

/// Opens the store at `file`, or at the platform default location.
///
/// # Errors
///
/// Returns an error if no file was given and the platform has no config
/// directory.
pub fn open_store(file: Option<PathBuf>) -> Result<JsonPreferencesStore> {
    match file {
        Some(path) => Ok(JsonPreferencesStore::new(path)),
        None => JsonPreferencesStore::default_location()
            .context("Failed to locate the preferences file"),
    }
}

/// Executes a `prefs` action against `store`.
///
/// # Errors
///
/// Returns an error if the preferences cannot be loaded or saved.
pub fn execute(store: &dyn PreferencesGateway, action: PrefsAction) -> Result<Preferences> {
    let mut preferences = store.load()?;

    match action {
        PrefsAction::Show => {}
        PrefsAction::Set {
            theme,
            volume,
            language,
        } => {
            apply_changes(&mut preferences, theme, volume, language);
            store.save(&preferences)?;
            tracing::info!(?preferences, "Preferences updated");
        }
    }

    Display::show_preferences(&preferences);
    Ok(preferences)
}

fn apply_changes(
    preferences: &mut Preferences,
    theme: Option<String>,
    volume: Option<u8>,
    language: Option<String>,
) {
    if let Some(theme) = theme {
        preferences.theme = theme;
    }
    if let Some(volume) = volume {
        preferences.set_volume(volume);
    }
    if let Some(language) = language {
        preferences.language = language;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let store = open_store(Some(path.clone())).unwrap();

        let prefs = execute(&store, PrefsAction::Show).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_set_persists_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferencesStore::new(dir.path().join("nested/prefs.json"));

        execute(
            &store,
            PrefsAction::Set {
                theme: Some("cyborg".to_string()),
                volume: None,
                language: Some("ja".to_string()),
            },
        )
        .unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.theme, "cyborg");
        assert_eq!(reloaded.volume, 50);
        assert_eq!(reloaded.language, "ja");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{").unwrap();

        let store = JsonPreferencesStore::new(path);
        assert!(execute(&store, PrefsAction::Show).is_err());
    }
}
