//! Key/value persistence
//!
//! The game only ever stores small strings: the highscore, the settings JSON
//! and the custom level collection. On web this is LocalStorage; natively (and
//! in tests) an in-memory map stands in.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// String storage keyed by name
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage, if the browser allows it
    pub fn open() -> Result<Self, StorageError> {
        let inner = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}

/// Read and decode a JSON value; missing or corrupt entries yield `None`
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let json = storage.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring corrupt '{}' entry: {}", key, err);
            None
        }
    }
}

/// Encode a value as JSON and store it
pub fn save_json<T: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|err| StorageError::Serialize {
        key: key.to_string(),
        reason: err.to_string(),
    })?;
    storage.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k"), None);
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k"), None);
    }

    #[test]
    fn test_corrupt_json_is_ignored() {
        let mut storage = MemoryStorage::new();
        storage.set_item("numbers", "{not json").unwrap();
        let loaded: Option<Vec<u32>> = load_json(&storage, "numbers");
        assert!(loaded.is_none());

        save_json(&mut storage, "numbers", &vec![1u32, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&storage, "numbers");
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }
}
