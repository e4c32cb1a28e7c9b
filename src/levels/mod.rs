//! Level layouts and where they come from
//!
//! A layout is the `BRICK_ROWS × BRICK_COLS` on/off pattern a level starts
//! with. Layouts are written as CSV: one grid row per line, `1` for a brick,
//! anything else for a gap.

pub mod custom;
pub mod source;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_COLS, BRICK_ROWS};

pub use custom::CustomLevelStore;
pub use source::{BuiltinLevels, CAMPAIGN_LEN, CustomLevelSource, LevelSource, campaign_path};

/// Identifies a level to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelId {
    /// Zero-based index into the campaign
    Campaign(usize),
    /// A user-authored level by name
    Custom(String),
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Campaign(index) => write!(f, "campaign level {}", index + 1),
            LevelId::Custom(name) => write!(f, "custom level '{}'", name),
        }
    }
}

/// Which bricks a level starts with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    rows: [[bool; BRICK_COLS]; BRICK_ROWS],
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl LevelLayout {
    pub fn empty() -> Self {
        Self {
            rows: [[false; BRICK_COLS]; BRICK_ROWS],
        }
    }

    /// Every cell filled (the fallback when a level can't be loaded)
    pub fn full() -> Self {
        Self {
            rows: [[true; BRICK_COLS]; BRICK_ROWS],
        }
    }

    /// Each cell filled with probability one half
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut layout = Self::empty();
        for row in layout.rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = rng.random::<f32>() > 0.5;
            }
        }
        layout
    }

    /// Parse CSV text leniently.
    ///
    /// Blank lines are skipped, each cell is read by its leading integer (so
    /// `1.0` and `1x` are bricks, `x1` is not), only `1` places a brick, and
    /// anything past the grid bounds is dropped.
    pub fn parse(text: &str) -> Self {
        let mut layout = Self::empty();
        let lines = text
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        for (row, line) in lines.take(BRICK_ROWS).enumerate() {
            for (col, value) in line.split(',').take(BRICK_COLS).enumerate() {
                layout.rows[row][col] = leading_int(value) == 1;
            }
        }
        layout
    }

    /// Serialize back to CSV (always the full grid, newline-terminated rows)
    pub fn to_csv(&self) -> String {
        let mut csv = String::with_capacity(BRICK_ROWS * (BRICK_COLS * 2 + 1));
        for row in &self.rows {
            let line: Vec<&str> = row.iter().map(|&on| if on { "1" } else { "0" }).collect();
            csv.push_str(&line.join(","));
            csv.push('\n');
        }
        csv
    }

    /// Whether `(col, row)` holds a brick; out-of-range cells are empty
    pub fn get(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Set a cell; out-of-range coordinates are ignored
    pub fn set(&mut self, col: usize, row: usize, on: bool) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = on;
        }
    }

    /// Flip a cell, returning its new value
    pub fn toggle(&mut self, col: usize, row: usize) -> bool {
        let on = !self.get(col, row);
        self.set(col, row, on);
        on
    }

    pub fn brick_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&on| on).count()
    }
}

/// Integer prefix of a cell after optional whitespace and sign; 0 if none
fn leading_int(cell: &str) -> i64 {
    let cell = cell.trim_start();
    let (negative, digits) = match cell.as_bytes().first() {
        Some(b'-') => (true, &cell[1..]),
        Some(b'+') => (false, &cell[1..]),
        _ => (false, cell),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);
    if negative { -value } else { value }
}
