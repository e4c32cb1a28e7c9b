//! Best score tracking
//!
//! Persisted as a plain decimal integer so it survives format changes.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::Storage;

/// The best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highscore {
    pub best: u64,
}

impl Highscore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "arkanoidHighscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Load the stored best score. Missing or unparsable values count as 0.
    pub fn load(storage: &dyn Storage) -> Self {
        let best = storage
            .get_item(Self::STORAGE_KEY)
            .and_then(|text| text.trim().parse::<u64>().ok())
            .unwrap_or(0);
        log::info!("Highscore: {}", best);
        Self { best }
    }

    /// Record a finished score. Returns true if it beat the best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), StorageError> {
        storage.set_item(Self::STORAGE_KEY, &self.best.to_string())?;
        log::info!("Highscore saved ({})", self.best);
        Ok(())
    }
}
