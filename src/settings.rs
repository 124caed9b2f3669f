//! Player preferences
//!
//! Persisted separately from the leaderboard, in the same store.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::highscores::normalize_name;
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last submitted tag, pre-filled in the name form
    pub initials: String,

    // === HUD ===
    /// Show the MM:SS run timer
    pub show_timer: bool,
    /// Show the arrow-key hint image under the shaft
    pub show_controls_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initials: "AAA".to_string(),
            show_timer: true,
            show_controls_hint: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "hell404_settings";

    /// Load settings, falling back to defaults on any error
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    settings.initials = normalize_name(&settings.initials);
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::persistence::tests::FailingStore;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            initials: "ZED".into(),
            show_timer: false,
            show_controls_hint: true,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let mut store = MemoryStore::new();
        store.set("hell404_settings", r#"{"initials":"q"}"#).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.initials, "Q__");
        assert!(settings.show_timer);
    }

    #[test]
    fn test_garbage_gives_defaults() {
        let mut store = MemoryStore::new();
        store.set("hell404_settings", "nope").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_unavailable_store_gives_defaults() {
        assert_eq!(Settings::load(&FailingStore), Settings::default());
        assert!(Settings::default().save(&mut FailingStore).is_err());
    }
}
