//! Level editor
//!
//! A toggle grid with the same geometry as the game board, drawn 30px in from
//! the editor canvas corner. Levels are saved into the custom level store by
//! name and can be exported as plain CSV files.

use rand::Rng;

use crate::consts::*;
use crate::error::StorageError;
use crate::levels::{CustomLevelStore, LevelLayout};
use crate::persistence::Storage;

/// Editor state: the layout being authored and the name it will be saved as
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelEditor {
    layout: LevelLayout,
    name: String,
}

impl LevelEditor {
    /// Grid offset within the editor canvas
    pub const OFFSET_LEFT: f32 = 30.0;
    pub const OFFSET_TOP: f32 = 30.0;
    /// Export name used when the level is unnamed
    pub const DEFAULT_EXPORT_NAME: &'static str = "custom_level";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Flip a cell, returning its new value
    pub fn toggle(&mut self, col: usize, row: usize) -> bool {
        self.layout.toggle(col, row)
    }

    /// Grid cell under an editor canvas position
    pub fn cell_at(x: f32, y: f32) -> Option<(usize, usize)> {
        let col = ((x - Self::OFFSET_LEFT) / (BRICK_WIDTH + BRICK_PADDING)).floor();
        let row = ((y - Self::OFFSET_TOP) / (BRICK_HEIGHT + BRICK_PADDING)).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < BRICK_COLS && row < BRICK_ROWS).then_some((col, row))
    }

    /// Toggle the cell under a click. Clicks outside the grid do nothing.
    pub fn toggle_at(&mut self, x: f32, y: f32) -> Option<bool> {
        Self::cell_at(x, y).map(|(col, row)| self.toggle(col, row))
    }

    pub fn clear(&mut self) {
        self.layout = LevelLayout::empty();
    }

    pub fn fill(&mut self) {
        self.layout = LevelLayout::full();
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.layout = LevelLayout::random(rng);
    }

    pub fn to_csv(&self) -> String {
        self.layout.to_csv()
    }

    /// Replace the grid with a parsed CSV layout
    pub fn import_csv(&mut self, text: &str) {
        self.layout = LevelLayout::parse(text);
    }

    /// File name for a CSV download
    pub fn export_file_name(&self) -> String {
        let name = self.name.trim();
        let name = if name.is_empty() {
            Self::DEFAULT_EXPORT_NAME
        } else {
            name
        };
        format!("{}.csv", name)
    }

    /// Save under the current name and persist the store. Returns false
    /// (and writes nothing) when the name is blank.
    pub fn save(
        &self,
        store: &mut CustomLevelStore,
        storage: &mut dyn Storage,
    ) -> Result<bool, StorageError> {
        if !store.insert(&self.name, &self.layout) {
            log::warn!("Refusing to save a level without a name");
            return Ok(false);
        }
        store.save(storage)?;
        log::info!("Level saved: {}", self.name.trim());
        Ok(true)
    }

    /// Open a saved level for editing
    pub fn load(&mut self, store: &CustomLevelStore, name: &str) -> bool {
        match store.get(name) {
            Some(layout) => {
                self.layout = layout;
                self.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Delete a saved level and persist the store
    pub fn delete(
        store: &mut CustomLevelStore,
        storage: &mut dyn Storage,
        name: &str,
    ) -> Result<bool, StorageError> {
        if !store.remove(name) {
            return Ok(false);
        }
        store.save(storage)?;
        log::info!("Level deleted: {}", name);
        Ok(true)
    }
}
