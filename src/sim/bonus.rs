//! Bonus drops and pickups
//!
//! Every so many destroyed bricks one of them drops a pickup. The interval is
//! re-drawn after each drop so drops stay roughly periodic without being
//! predictable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::pickup_caught;
use super::state::{Ball, GameEvent, GameState, Pickup, PickupKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Counts destroyed bricks and decides when the next one drops a pickup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPolicy {
    pub bricks_since_last_bonus: u32,
    pub threshold: u32,
}

impl BonusPolicy {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            bricks_since_last_bonus: 0,
            threshold: tuning.first_bonus_threshold,
        }
    }

    /// Record a brick that just finished flashing. Returns the pickup it
    /// drops, if this brick reached the threshold.
    pub fn brick_destroyed<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Option<PickupKind> {
        self.bricks_since_last_bonus += 1;
        if self.bricks_since_last_bonus < self.threshold {
            return None;
        }
        self.bricks_since_last_bonus = 0;
        self.threshold = rng.random_range(tuning.bonus_threshold_min..=tuning.bonus_threshold_max);
        Some(PickupKind::roll(rng, tuning.widen_chance))
    }
}

impl PickupKind {
    /// WidenPaddle with probability `widen_chance`, otherwise MultiBall
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, widen_chance: f32) -> Self {
        if rng.random::<f32>() < widen_chance {
            PickupKind::WidenPaddle
        } else {
            PickupKind::MultiBall
        }
    }
}

/// Drop a pickup from a brick's center
pub fn spawn_pickup(state: &mut GameState, kind: PickupKind, at: Vec2) {
    let id = state.next_entity_id();
    state.pickups.push(Pickup {
        id,
        kind,
        pos: at,
        vy: state.tuning.pickup_fall_speed,
    });
    state.events.push(GameEvent::PickupSpawned(kind));
}

/// Advance falling pickups, apply the ones the paddle catches and drop the
/// ones that leave the board.
pub fn update_pickups(state: &mut GameState) {
    let gravity = state.tuning.pickup_gravity;
    let paddle = state.paddle.clone();

    let mut caught = Vec::new();
    state.pickups.retain_mut(|pickup| {
        pickup.vy += gravity;
        pickup.pos.y += pickup.vy;

        if pickup_caught(&pickup.bounds(), &paddle) {
            caught.push(pickup.kind);
            false
        } else {
            pickup.bounds().min.y <= BOARD_HEIGHT
        }
    });

    for kind in caught {
        apply_pickup(state, kind);
    }
}

/// Apply a caught pickup's effect
pub fn apply_pickup(state: &mut GameState, kind: PickupKind) {
    match kind {
        PickupKind::WidenPaddle => {
            let (factor, ticks) = (state.tuning.widen_factor, state.tuning.widen_ticks);
            state.paddle.widen(factor, ticks);
        }
        PickupKind::MultiBall => spawn_multiball(state),
    }
    state.events.push(GameEvent::PickupCaught(kind));
}

/// Two extra balls from the paddle's top center, diverging symmetrically
pub fn spawn_multiball(state: &mut GameState) {
    let speed = state.tuning.ball_speed;
    let spread = state.tuning.multiball_spread;
    let origin = Vec2::new(state.paddle.center(), PADDLE_Y - BALL_RADIUS - 1.0);

    for side in [-1.0f32, 1.0] {
        let id = state.next_entity_id();
        state.balls.push(Ball {
            id,
            pos: origin,
            vel: Vec2::new(side * speed * spread.sin(), -speed * spread.cos()),
            radius: BALL_RADIUS,
        });
    }
}
