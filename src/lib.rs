//! Brick Breaker - a browser brick-breaker arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, level state machine)
//! - `levels`: Level layouts, the campaign and custom level sources
//! - `editor`: Level editor grid for authoring custom levels
//! - `session`: Drives a game against a level source and a storage backend
//! - `platform`: Input sampling (keyboard, gamepad)
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod editor;
pub mod error;
pub mod highscores;
pub mod levels;
pub mod persistence;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, StorageError};
pub use highscores::Highscore;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second, for converting durations
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 480.0;
    pub const BOARD_HEIGHT: f32 = 500.0;
    /// Bottom edge of the score header; the ball bounces off it
    pub const HEADER_HEIGHT: f32 = 40.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between the paddle bottom and the board bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;
    /// Top edge of the paddle
    pub const PADDLE_Y: f32 = BOARD_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN;

    /// Ball defaults (pixels per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 4.0;

    /// Brick grid layout
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 8;
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 1.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;
    pub const BRICK_OFFSET_TOP: f32 = 60.0;

    /// Starting (and reset) score multiplier
    pub const BASE_MULTIPLIER: u64 = 10;
    /// Multiplier growth per destroyed brick
    pub const MULTIPLIER_STEP: u64 = 10;
}

/// Ball start position for a fresh serve
#[inline]
pub fn serve_position() -> glam::Vec2 {
    glam::Vec2::new(consts::BOARD_WIDTH / 2.0, consts::BOARD_HEIGHT - 50.0)
}

/// Paddle x (left edge) that centers it on the board
#[inline]
pub fn centered_paddle_x(width: f32) -> f32 {
    (consts::BOARD_WIDTH - width) / 2.0
}

/// Clamp a paddle's left edge so it stays on the board
#[inline]
pub fn clamp_paddle_x(x: f32, width: f32) -> f32 {
    x.clamp(0.0, (consts::BOARD_WIDTH - width).max(0.0))
}
