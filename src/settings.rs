//! Game settings and preferences
//!
//! Persisted separately from the highscore, as JSON.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{self, Storage};
use crate::sim::AXIS_DEADZONE;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on brick and wall hits
    pub screen_shake: bool,
    /// Floating "+N" text over struck bricks
    pub score_popups: bool,

    // === Input ===
    /// Stick values below this are treated as centered
    pub gamepad_deadzone: f32,

    // === Accessibility ===
    /// Reduced motion (no shake, no floating text)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            score_popups: true,
            gamepad_deadzone: AXIS_DEADZONE,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "brick_breaker_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective score popups (respects reduced_motion)
    pub fn effective_score_popups(&self) -> bool {
        self.score_popups && !self.reduced_motion
    }

    /// Deadzone clamped to a usable range
    pub fn deadzone(&self) -> f32 {
        if self.gamepad_deadzone.is_finite() {
            self.gamepad_deadzone.clamp(0.0, 0.9)
        } else {
            AXIS_DEADZONE
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match persistence::load_json(storage, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_score_popups());
        assert!(Settings::default().effective_screen_shake());
    }

    #[test]
    fn test_settings_roundtrip_through_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Settings::load(&storage), Settings::default());

        let settings = Settings {
            screen_shake: false,
            gamepad_deadzone: 0.25,
            ..Default::default()
        };
        settings.save(&mut storage).unwrap();
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Settings::STORAGE_KEY, r#"{"reduced_motion":true}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert!(settings.reduced_motion);
        assert!(settings.screen_shake);
    }

    #[test]
    fn test_deadzone_is_clamped() {
        let settings = Settings {
            gamepad_deadzone: 4.0,
            ..Default::default()
        };
        assert_eq!(settings.deadzone(), 0.9);
        let settings = Settings {
            gamepad_deadzone: f32::NAN,
            ..Default::default()
        };
        assert_eq!(settings.deadzone(), AXIS_DEADZONE);
    }
}
