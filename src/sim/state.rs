//! Game state and core simulation types
//!
//! Everything the tick function reads or writes lives in [`GameState`]; the
//! renderer only ever borrows it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::BonusPolicy;
use super::geom::Aabb;
use super::grid::BrickGrid;
use crate::consts::*;
use crate::levels::LevelId;
use crate::tuning::Tuning;
use crate::{centered_paddle_x, clamp_paddle_x, serve_position};

/// Why a run ended in victory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Victory {
    /// The last campaign level was cleared
    CampaignComplete,
    /// A single custom level was cleared
    CustomLevelComplete,
}

/// Current phase of the level state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first layout of a run
    Loading { level: LevelId, requested: bool },
    /// Active gameplay
    Playing,
    /// Level cleared, waiting for the next campaign layout
    Transitioning { next: usize, requested: bool },
    /// Run ended with every level cleared
    Won(Victory),
    /// Run ended with every ball lost
    Lost,
}

impl GamePhase {
    /// Won or Lost: the tick loop no longer advances
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won(_) | GamePhase::Lost)
    }
}

/// Campaign or a single custom level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Campaign { levels: usize },
    Custom { name: String },
}

impl GameMode {
    /// The level a run starts on
    pub fn first_level(&self) -> LevelId {
        match self {
            GameMode::Campaign { .. } => LevelId::Campaign(0),
            GameMode::Custom { name } => LevelId::Custom(name.clone()),
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// A ball at the serve position heading up and to the right
    pub fn served(id: u32, speed: f32) -> Self {
        Self {
            id,
            pos: serve_position(),
            vel: Vec2::new(speed, -speed),
            radius: BALL_RADIUS,
        }
    }

    /// Bounding square used for brick and pickup tests
    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }

    /// Where the ball was at the start of this tick
    pub fn previous_pos(&self) -> Vec2 {
        self.pos - self.vel
    }
}

/// Active WidenPaddle effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Widen {
    /// Width before the first widen, restored on expiry
    pub original: f32,
    pub ticks_left: u32,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub widen: Option<Widen>,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: centered_paddle_x(PADDLE_WIDTH),
            width: PADDLE_WIDTH,
            widen: None,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether `x` lies strictly inside the paddle's horizontal span
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x > self.x && x < self.x + self.width
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(Vec2::new(self.x, PADDLE_Y), Vec2::new(self.width, PADDLE_HEIGHT))
    }

    /// Move horizontally, staying on the board
    pub fn move_by(&mut self, dx: f32) {
        self.x = clamp_paddle_x(self.x + dx, self.width);
    }

    /// Change width keeping the current center, then clamp to the board
    pub fn set_width_centered(&mut self, width: f32) {
        let center = self.center();
        self.width = width.min(BOARD_WIDTH);
        self.x = clamp_paddle_x(center - self.width / 2.0, self.width);
    }

    /// Start or refresh the widen effect
    pub fn widen(&mut self, factor: f32, ticks: u32) {
        let original = self.widen.map(|w| w.original).unwrap_or(self.width);
        self.set_width_centered(original * factor);
        self.widen = Some(Widen {
            original,
            ticks_left: ticks,
        });
    }

    /// Count down the widen effect. Returns true on the tick it expires.
    pub fn tick_effects(&mut self) -> bool {
        if let Some(widen) = self.widen.as_mut() {
            widen.ticks_left = widen.ticks_left.saturating_sub(1);
            if widen.ticks_left == 0 {
                let original = widen.original;
                self.widen = None;
                self.set_width_centered(original);
                return true;
            }
        }
        false
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    WidenPaddle,
    MultiBall,
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    /// Center
    pub pos: Vec2,
    pub vy: f32,
}

impl Pickup {
    /// Catch box size
    pub const SIZE: Vec2 = Vec2::new(20.0, 10.0);

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Self::SIZE / 2.0)
    }
}

/// Render-side screen shake request
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub ticks_left: u32,
    pub intensity: f32,
}

impl ScreenShake {
    pub fn trigger(&mut self, ticks: u32, intensity: f32) {
        self.ticks_left = ticks;
        self.intensity = intensity;
    }

    pub fn decay(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            self.intensity = 0.0;
        }
    }

    pub fn active(&self) -> bool {
        self.ticks_left > 0
    }
}

/// Floating "+N" text over a struck brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub points: u64,
    pub opacity: f32,
}

impl ScorePopup {
    pub fn text(&self) -> String {
        format!("+{}", self.points)
    }
}

/// Things that happened during a tick (for sound, UI, persistence)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickHit { col: usize, row: usize, points: u64 },
    WallBounce,
    PaddleBounce,
    BallLost { remaining: usize },
    PickupSpawned(PickupKind),
    PickupCaught(PickupKind),
    WidenExpired,
    LevelCleared { level: usize },
    LevelLoaded(LevelId),
    LevelLoadFailed { level: LevelId, reason: String },
    Won { victory: Victory, score: u64 },
    Lost { score: u64 },
    NewHighscore(u64),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Current campaign level (0-based; always 0 for custom levels)
    pub level_index: usize,
    pub score: u64,
    /// Points awarded for the next brick
    pub multiplier: u64,
    /// Best score seen, including previous sessions
    pub highscore: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Balls in play (sorted by id)
    pub balls: Vec<Ball>,
    pub grid: BrickGrid,
    /// Falling pickups (sorted by id)
    pub pickups: Vec<Pickup>,
    pub bonus: BonusPolicy,
    pub shake: ScreenShake,
    #[serde(skip)]
    pub popups: Vec<ScorePopup>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new run that waits for the first layout of `mode`
    pub fn new(seed: u64, mode: GameMode, tuning: Tuning) -> Self {
        let phase = GamePhase::Loading {
            level: mode.first_level(),
            requested: false,
        };
        let bonus = BonusPolicy::new(&tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            mode,
            phase,
            level_index: 0,
            score: 0,
            multiplier: BASE_MULTIPLIER,
            highscore: 0,
            time_ticks: 0,
            paddle: Paddle::default(),
            balls: Vec::new(),
            grid: BrickGrid::new(),
            pickups: Vec::new(),
            bonus,
            shake: ScreenShake::default(),
            popups: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.serve();
        state
    }

    /// New campaign run with default tuning
    pub fn campaign(seed: u64, levels: usize) -> Self {
        Self::new(seed, GameMode::Campaign { levels }, Tuning::default())
    }

    /// New single custom level run with default tuning
    pub fn custom(seed: u64, name: impl Into<String>) -> Self {
        Self::new(
            seed,
            GameMode::Custom { name: name.into() },
            Tuning::default(),
        )
    }

    /// Carry over the best score from storage
    pub fn with_highscore(mut self, highscore: u64) -> Self {
        self.highscore = highscore;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace all balls with a single fresh serve
    pub fn serve(&mut self) {
        self.balls.clear();
        let id = self.next_entity_id();
        self.balls.push(Ball::served(id, self.tuning.ball_speed));
    }

    /// Reset everything a level starts with except the score
    pub fn reset_for_level(&mut self) {
        self.serve();
        self.paddle = Paddle::default();
        self.pickups.clear();
        self.multiplier = BASE_MULTIPLIER;
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.pickups.sort_by_key(|p| p.id);
    }

    /// Whether the run has ended
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_for_first_level() {
        let state = GameState::campaign(1, 10);
        assert_eq!(
            state.phase,
            GamePhase::Loading {
                level: LevelId::Campaign(0),
                requested: false
            }
        );
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.multiplier, 10);
        assert_eq!(state.paddle.x, (480.0 - 75.0) / 2.0);
    }

    #[test]
    fn test_paddle_clamped_to_board() {
        let mut paddle = Paddle::default();
        paddle.move_by(-1000.0);
        assert_eq!(paddle.x, 0.0);
        paddle.move_by(1000.0);
        assert_eq!(paddle.x, BOARD_WIDTH - PADDLE_WIDTH);
    }

    #[test]
    fn test_paddle_span_is_strict() {
        let paddle = Paddle::default();
        assert!(!paddle.spans(paddle.x));
        assert!(paddle.spans(paddle.center()));
        assert!(!paddle.spans(paddle.x + paddle.width));
    }

    #[test]
    fn test_widen_expires_after_exact_duration() {
        let mut paddle = Paddle::default();
        paddle.x = 100.0;
        let center = paddle.center();
        paddle.widen(2.0, 600);
        assert_eq!(paddle.width, 150.0);
        assert_eq!(paddle.center(), center);

        for _ in 0..599 {
            assert!(!paddle.tick_effects());
        }
        assert_eq!(paddle.width, 150.0);
        assert!(paddle.tick_effects());
        assert_eq!(paddle.width, PADDLE_WIDTH);
        assert_eq!(paddle.center(), center);
        assert!(paddle.widen.is_none());
    }

    #[test]
    fn test_widen_refresh_keeps_original_width() {
        let mut paddle = Paddle::default();
        paddle.widen(2.0, 600);
        for _ in 0..300 {
            paddle.tick_effects();
        }
        paddle.widen(2.0, 600);
        // Refresh does not compound
        assert_eq!(paddle.width, 150.0);
        assert_eq!(paddle.widen.unwrap().ticks_left, 600);
        assert_eq!(paddle.widen.unwrap().original, PADDLE_WIDTH);
    }

    #[test]
    fn test_widen_near_wall_is_clamped() {
        let mut paddle = Paddle::default();
        paddle.x = BOARD_WIDTH - PADDLE_WIDTH;
        paddle.widen(2.0, 10);
        assert_eq!(paddle.x + paddle.width, BOARD_WIDTH);

        for _ in 0..10 {
            paddle.tick_effects();
        }
        assert_eq!(paddle.width, PADDLE_WIDTH);
        assert!(paddle.x >= 0.0 && paddle.x + paddle.width <= BOARD_WIDTH);
    }

    #[test]
    fn test_screen_shake_decays() {
        let mut shake = ScreenShake::default();
        shake.trigger(2, 3.0);
        assert!(shake.active());
        shake.decay();
        shake.decay();
        assert!(!shake.active());
        assert_eq!(shake.intensity, 0.0);
    }
}
