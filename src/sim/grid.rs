//! Brick grid
//!
//! A fixed `BRICK_ROWS × BRICK_COLS` grid. Each cell walks the destroy
//! animation Active → Flashing → Falling → Empty and never skips a step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Aabb;
use crate::consts::*;
use crate::levels::LevelLayout;
use crate::tuning::Tuning;

/// Lifecycle of a single brick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BrickState {
    #[default]
    Empty,
    Active,
    /// Struck; shown white for a few ticks before it drops
    Flashing { ticks_left: u32 },
    /// Falling and fading out (not collidable)
    Falling { y: f32, vy: f32, opacity: f32 },
}

impl BrickState {
    /// Active and flashing bricks both keep the level from being cleared
    pub fn counts_for_clear(&self) -> bool {
        matches!(self, BrickState::Active | BrickState::Flashing { .. })
    }
}

/// One grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickCell {
    pub col: usize,
    pub row: usize,
    /// Resting top-left corner, fixed by the cell's grid coordinates
    pub pos: Vec2,
    pub state: BrickState,
}

impl BrickCell {
    fn new(col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            pos: cell_origin(col, row),
            state: BrickState::Empty,
        }
    }

    /// Collision box at the resting position
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::new(BRICK_WIDTH, BRICK_HEIGHT))
    }

    /// Where the brick is drawn this tick (falling bricks drift down)
    pub fn draw_pos(&self) -> Vec2 {
        match self.state {
            BrickState::Falling { y, .. } => Vec2::new(self.pos.x, y),
            _ => self.pos,
        }
    }
}

/// Top-left corner of the cell at `(col, row)`
pub fn cell_origin(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
        row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
    )
}

/// The brick grid, stored column-major (the collision scan order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    cells: Vec<BrickCell>,
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickGrid {
    /// An all-empty grid
    pub fn new() -> Self {
        let mut cells = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
        for col in 0..BRICK_COLS {
            for row in 0..BRICK_ROWS {
                cells.push(BrickCell::new(col, row));
            }
        }
        Self { cells }
    }

    /// Grid with a brick wherever the layout has one
    pub fn from_layout(layout: &LevelLayout) -> Self {
        let mut grid = Self::new();
        grid.load(layout);
        grid
    }

    /// Replace every cell's state from a layout (animations are discarded)
    pub fn load(&mut self, layout: &LevelLayout) {
        for cell in &mut self.cells {
            cell.state = if layout.get(cell.col, cell.row) {
                BrickState::Active
            } else {
                BrickState::Empty
            };
        }
    }

    #[inline]
    fn index(col: usize, row: usize) -> usize {
        col * BRICK_ROWS + row
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&BrickCell> {
        (col < BRICK_COLS && row < BRICK_ROWS).then(|| &self.cells[Self::index(col, row)])
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut BrickCell> {
        if col < BRICK_COLS && row < BRICK_ROWS {
            Some(&mut self.cells[Self::index(col, row)])
        } else {
            None
        }
    }

    /// Cells in column-major order
    pub fn iter(&self) -> impl Iterator<Item = &BrickCell> {
        self.cells.iter()
    }

    /// Bricks still standing between the player and the next level
    pub fn remaining(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.state.counts_for_clear())
            .count()
    }

    /// Advance flash and fall animations by one tick.
    ///
    /// Returns the cells whose flash finished this tick (they just started
    /// falling), in scan order.
    pub fn update(&mut self, tuning: &Tuning) -> Vec<(usize, usize)> {
        let mut finished = Vec::new();
        for cell in &mut self.cells {
            match cell.state {
                BrickState::Flashing { ticks_left } => {
                    let ticks_left = ticks_left.saturating_sub(1);
                    if ticks_left == 0 {
                        cell.state = BrickState::Falling {
                            y: cell.pos.y,
                            vy: 0.0,
                            opacity: 1.0,
                        };
                        finished.push((cell.col, cell.row));
                    } else {
                        cell.state = BrickState::Flashing { ticks_left };
                    }
                }
                BrickState::Falling { y, vy, opacity } => {
                    let vy = vy + tuning.brick_gravity;
                    let y = y + vy;
                    let opacity = opacity - tuning.brick_fade;
                    cell.state = if opacity <= 0.0 || y > BOARD_HEIGHT {
                        BrickState::Empty
                    } else {
                        BrickState::Falling { y, vy, opacity }
                    };
                }
                BrickState::Empty | BrickState::Active => {}
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_always_full_size() {
        let grid = BrickGrid::new();
        assert_eq!(grid.iter().count(), BRICK_ROWS * BRICK_COLS);
        assert_eq!(grid.remaining(), 0);
        assert!(grid.get(BRICK_COLS, 0).is_none());
        assert!(grid.get(0, BRICK_ROWS).is_none());
    }

    #[test]
    fn test_cell_positions() {
        let grid = BrickGrid::new();
        let cell = grid.get(2, 3).unwrap();
        assert_eq!(cell.pos, Vec2::new(2.0 * 51.0 + 30.0, 3.0 * 21.0 + 60.0));
    }

    #[test]
    fn test_destroy_animation_order() {
        let tuning = Tuning::default();
        let mut layout = LevelLayout::empty();
        layout.set(0, 0, true);
        let mut grid = BrickGrid::from_layout(&layout);
        assert_eq!(grid.remaining(), 1);

        grid.get_mut(0, 0).unwrap().state = BrickState::Flashing {
            ticks_left: tuning.flash_ticks,
        };
        // Flashing still counts
        assert_eq!(grid.remaining(), 1);

        for _ in 0..tuning.flash_ticks - 1 {
            assert!(grid.update(&tuning).is_empty());
        }
        assert_eq!(grid.update(&tuning), vec![(0, 0)]);
        assert!(matches!(
            grid.get(0, 0).unwrap().state,
            BrickState::Falling { .. }
        ));
        assert_eq!(grid.remaining(), 0);

        // Fades out after ~40 ticks (opacity 1.0 at 0.025 per tick)
        for _ in 0..45 {
            grid.update(&tuning);
        }
        assert_eq!(grid.get(0, 0).unwrap().state, BrickState::Empty);
    }

    #[test]
    fn test_falling_brick_moves_down() {
        let tuning = Tuning::default();
        let mut grid = BrickGrid::new();
        let start_y = grid.get(1, 1).unwrap().pos.y;
        grid.get_mut(1, 1).unwrap().state = BrickState::Falling {
            y: start_y,
            vy: 0.0,
            opacity: 1.0,
        };
        grid.update(&tuning);
        grid.update(&tuning);
        let cell = grid.get(1, 1).unwrap();
        assert!(cell.draw_pos().y > start_y);
        assert_eq!(cell.pos.y, start_y);
    }
}
