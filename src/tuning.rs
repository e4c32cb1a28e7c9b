//! Data-driven game balance
//!
//! Every number the simulation uses that a designer might want to tweak.
//! Missing fields in a JSON override fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a ball/brick overlap picks the axis to reflect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Reflect on the axis with the smaller overlap and push the ball out of the brick
    #[default]
    OverlapMagnitude,
    /// Reflect on the axis the previous-tick position had already cleared; no push-out
    PreviousPosition,
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball speed at serve (pixels per tick)
    pub ball_speed: f32,
    /// Maximum paddle bounce angle from vertical (radians)
    pub max_bounce_angle: f32,
    /// Digital paddle speed (pixels per tick)
    pub paddle_speed: f32,
    /// Analog paddle speed at full stick tilt (pixels per tick)
    pub paddle_analog_speed: f32,

    /// Ticks a struck brick flashes before it starts falling
    pub flash_ticks: u32,
    /// Falling brick gravity (pixels per tick²)
    pub brick_gravity: f32,
    /// Falling brick opacity lost per tick
    pub brick_fade: f32,
    /// Distance a resolved ball is pushed outside the brick
    pub brick_nudge: f32,
    pub collision: CollisionStrategy,

    /// Bricks destroyed before the first bonus drop
    pub first_bonus_threshold: u32,
    /// Inclusive range the next threshold is drawn from after each drop
    pub bonus_threshold_min: u32,
    pub bonus_threshold_max: u32,
    /// Probability a drop is WidenPaddle (otherwise MultiBall)
    pub widen_chance: f32,
    /// Initial pickup fall speed (pixels per tick)
    pub pickup_fall_speed: f32,
    /// Pickup gravity (pixels per tick²)
    pub pickup_gravity: f32,
    /// WidenPaddle duration in ticks
    pub widen_ticks: u32,
    /// WidenPaddle width factor
    pub widen_factor: f32,
    /// MultiBall spread from vertical (radians)
    pub multiball_spread: f32,

    /// Screen shake on brick hit (ticks, pixels)
    pub brick_shake_ticks: u32,
    pub brick_shake_intensity: f32,
    /// Screen shake on side wall hit (ticks, pixels)
    pub wall_shake_ticks: u32,
    pub wall_shake_intensity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: BALL_SPEED,
            max_bounce_angle: std::f32::consts::FRAC_PI_3,
            paddle_speed: 5.0,
            paddle_analog_speed: 7.0,

            flash_ticks: 6,
            brick_gravity: 0.25,
            brick_fade: 0.025,
            brick_nudge: 0.1,
            collision: CollisionStrategy::OverlapMagnitude,

            first_bonus_threshold: 10,
            bonus_threshold_min: 8,
            bonus_threshold_max: 12,
            widen_chance: 0.6,
            pickup_fall_speed: 1.0,
            pickup_gravity: 0.05,
            widen_ticks: 10 * TICKS_PER_SECOND,
            widen_factor: 2.0,
            multiball_spread: std::f32::consts::FRAC_PI_6,

            brick_shake_ticks: 6,
            brick_shake_intensity: 3.0,
            wall_shake_ticks: 4,
            wall_shake_intensity: 2.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Repair values that would break the simulation
    pub fn sanitize(&mut self) {
        if self.bonus_threshold_min > self.bonus_threshold_max {
            std::mem::swap(&mut self.bonus_threshold_min, &mut self.bonus_threshold_max);
        }
        self.bonus_threshold_min = self.bonus_threshold_min.max(1);
        self.bonus_threshold_max = self.bonus_threshold_max.max(1);
        self.first_bonus_threshold = self.first_bonus_threshold.max(1);
        self.widen_chance = self.widen_chance.clamp(0.0, 1.0);
        self.flash_ticks = self.flash_ticks.max(1);
        self.widen_factor = self.widen_factor.max(1.0);
    }
}
