//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bonus;
pub mod collision;
pub mod geom;
pub mod grid;
mod level;
pub mod state;
pub mod tick;

pub use bonus::BonusPolicy;
pub use collision::{BrickAxis, EdgeContact, paddle_bounce, resolve_ball_brick};
pub use geom::Aabb;
pub use grid::{BrickCell, BrickGrid, BrickState};
pub use state::{
    Ball, GameEvent, GameMode, GamePhase, GameState, Paddle, Pickup, PickupKind, ScorePopup,
    ScreenShake, Victory,
};
pub use tick::{AXIS_DEADZONE, TickInput, tick};
