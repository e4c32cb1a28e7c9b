//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard, gamepad)
//! - Storage (LocalStorage on web, see `persistence`)

pub mod input;

pub use input::{GamepadSnapshot, GamepadState, InputState, KeyboardState};
