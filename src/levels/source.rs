//! Level sources
//!
//! The simulation asks for a layout by [`LevelId`] and gets a layout or an
//! error back. Natively the campaign is compiled in; the browser build fetches
//! the same CSV files from `levels/`.

use super::{CustomLevelStore, LevelId, LevelLayout};
use crate::error::LevelError;

/// Number of campaign levels
pub const CAMPAIGN_LEN: usize = 10;

/// Campaign CSV files, in play order
const CAMPAIGN: [&str; CAMPAIGN_LEN] = [
    include_str!("../../levels/level1.csv"),
    include_str!("../../levels/level2.csv"),
    include_str!("../../levels/level3.csv"),
    include_str!("../../levels/level4.csv"),
    include_str!("../../levels/level5.csv"),
    include_str!("../../levels/level6.csv"),
    include_str!("../../levels/level7.csv"),
    include_str!("../../levels/level8.csv"),
    include_str!("../../levels/level9.csv"),
    include_str!("../../levels/level10.csv"),
];

/// URL path of a campaign level (served next to the wasm bundle)
pub fn campaign_path(index: usize) -> String {
    format!("levels/level{}.csv", index + 1)
}

/// Something that can produce level layouts
pub trait LevelSource {
    /// Number of levels in the campaign
    fn campaign_len(&self) -> usize;

    /// Produce the layout for a level
    fn load(&mut self, id: &LevelId) -> Result<LevelLayout, LevelError>;
}

/// The compiled-in campaign
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

impl LevelSource for BuiltinLevels {
    fn campaign_len(&self) -> usize {
        CAMPAIGN_LEN
    }

    fn load(&mut self, id: &LevelId) -> Result<LevelLayout, LevelError> {
        match id {
            LevelId::Campaign(index) => CAMPAIGN
                .get(*index)
                .map(|csv| LevelLayout::parse(csv))
                .ok_or_else(|| LevelError::NoSuchLevel {
                    level: id.to_string(),
                }),
            LevelId::Custom(_) => Err(LevelError::NoSuchLevel {
                level: id.to_string(),
            }),
        }
    }
}

/// The campaign plus the player's saved custom levels
#[derive(Debug, Clone, Default)]
pub struct CustomLevelSource {
    store: CustomLevelStore,
}

impl CustomLevelSource {
    pub fn new(store: CustomLevelStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CustomLevelStore {
        &self.store
    }
}

impl LevelSource for CustomLevelSource {
    fn campaign_len(&self) -> usize {
        CAMPAIGN_LEN
    }

    fn load(&mut self, id: &LevelId) -> Result<LevelLayout, LevelError> {
        match id {
            LevelId::Campaign(_) => BuiltinLevels.load(id),
            LevelId::Custom(name) => {
                self.store
                    .get(name)
                    .ok_or_else(|| LevelError::NoSuchLevel {
                        level: id.to_string(),
                    })
            }
        }
    }
}
