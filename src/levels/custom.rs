//! Player-authored levels
//!
//! Stored as one JSON object mapping level name to CSV text, so levels saved
//! by the editor can be read by the game and exported as plain files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::LevelLayout;
use crate::error::StorageError;
use crate::persistence::{self, Storage};

/// Named custom levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomLevelStore {
    levels: BTreeMap<String, String>,
}

impl CustomLevelStore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "arkanoid_custom_levels";

    /// Load the collection; a missing or corrupt entry yields an empty store
    pub fn load(storage: &dyn Storage) -> Self {
        let store: Self = persistence::load_json(storage, Self::STORAGE_KEY).unwrap_or_default();
        log::info!("Loaded {} custom levels", store.levels.len());
        store
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)?;
        log::info!("Custom levels saved ({} entries)", self.levels.len());
        Ok(())
    }

    /// Level names in display order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.levels.contains_key(name)
    }

    /// Raw CSV text of a level
    pub fn csv(&self, name: &str) -> Option<&str> {
        self.levels.get(name).map(String::as_str)
    }

    /// Parsed layout of a level
    pub fn get(&self, name: &str) -> Option<LevelLayout> {
        self.csv(name).map(LevelLayout::parse)
    }

    /// Add or overwrite a level. Names are trimmed; blank names are rejected.
    pub fn insert(&mut self, name: &str, layout: &LevelLayout) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.levels.insert(name.to_string(), layout.to_csv());
        true
    }

    /// Delete a level, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        self.levels.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_store_persists_through_storage() {
        let mut storage = MemoryStorage::new();
        let mut store = CustomLevelStore::load(&storage);
        assert!(store.is_empty());

        let mut layout = LevelLayout::empty();
        layout.set(1, 1, true);
        assert!(store.insert("  tiny  ", &layout));
        store.save(&mut storage).unwrap();

        let reloaded = CustomLevelStore::load(&storage);
        assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["tiny"]);
        assert_eq!(reloaded.get("tiny"), Some(layout));
    }

    #[test]
    fn test_blank_names_rejected() {
        let mut store = CustomLevelStore::default();
        assert!(!store.insert("   ", &LevelLayout::full()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut store = CustomLevelStore::default();
        store.insert("a", &LevelLayout::full());
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
    }

    #[test]
    fn test_reads_plain_json_object() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(CustomLevelStore::STORAGE_KEY, r#"{"zig":"1,0,1\n0,1,0\n"}"#)
            .unwrap();
        let store = CustomLevelStore::load(&storage);
        let layout = store.get("zig").unwrap();
        assert!(layout.get(0, 0) && layout.get(2, 0) && layout.get(1, 1));
        assert_eq!(layout.brick_count(), 3);
    }
}
