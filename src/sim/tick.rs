//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Velocities are
//! in pixels per tick.

use glam::Vec2;

use super::bonus::{spawn_pickup, update_pickups};
use super::collision::{EdgeContact, find_brick_hit, paddle_line, resolve_ball_brick, resolve_edges};
use super::grid::BrickState;
use super::state::{Ball, GameEvent, GamePhase, GameState, ScorePopup};
use crate::consts::*;

/// Default stick deadzone; input sampling zeroes values closer to zero
pub const AXIS_DEADZONE: f32 = 0.15;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Digital left (arrow key, d-pad)
    pub left: bool,
    /// Digital right; wins over left when both are held
    pub right: bool,
    /// Analog stick in [-1, 1], already deadzoned; any non-zero value
    /// overrides digital input
    pub axis: f32,
    /// Confirm / restart (edge-triggered, set for one tick)
    pub primary_action: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Only Playing advances; loading and terminal phases wait on the driver
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    state.shake.decay();
    update_popups(state);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    move_paddle(state, &input);

    // Brick animations; a brick that finishes flashing may drop a bonus
    for (col, row) in state.grid.update(&state.tuning) {
        if let Some(kind) = state.bonus.brick_destroyed(&mut state.rng, &state.tuning) {
            let at = cell_center(state, col, row);
            log::debug!("Brick ({}, {}) dropped {:?}", col, row, kind);
            spawn_pickup(state, kind, at);
        }
    }

    update_balls(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    update_pickups(state);
    if state.paddle.tick_effects() {
        state.events.push(GameEvent::WidenExpired);
    }

    if state.grid.remaining() == 0 {
        state.advance_level();
    }

    state.normalize_order();
}

fn cell_center(state: &GameState, col: usize, row: usize) -> Vec2 {
    state
        .grid
        .get(col, row)
        .map(|cell| cell.bounds().center())
        .unwrap_or_default()
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let tuning = &state.tuning;
    let dx = if input.axis != 0.0 {
        input.axis.clamp(-1.0, 1.0) * tuning.paddle_analog_speed
    } else if input.right {
        tuning.paddle_speed
    } else if input.left {
        -tuning.paddle_speed
    } else {
        0.0
    };
    if dx != 0.0 {
        state.paddle.move_by(dx);
    }
}

/// Integrate every ball and resolve bricks, walls and the paddle
fn update_balls(state: &mut GameState) {
    let strategy = state.tuning.collision;
    let nudge = state.tuning.brick_nudge;
    let max_angle = state.tuning.max_bounce_angle;

    let mut balls = std::mem::take(&mut state.balls);
    let mut lost = 0;

    balls.retain_mut(|ball| {
        ball.pos += ball.vel;

        // One brick per ball per tick
        if let Some((col, row)) = find_brick_hit(ball, &state.grid) {
            if let Some(cell) = state.grid.get(col, row) {
                let bounds = cell.bounds();
                resolve_ball_brick(ball, &bounds, strategy, nudge);
                hit_brick(state, col, row);
            }
        }

        let edges = resolve_edges(ball, &state.paddle, max_angle);
        if edges.side_wall {
            let (ticks, intensity) = (state.tuning.wall_shake_ticks, state.tuning.wall_shake_intensity);
            state.shake.trigger(ticks, intensity);
            state.events.push(GameEvent::WallBounce);
        }
        match edges.contact {
            EdgeContact::Clear => true,
            EdgeContact::Ceiling => {
                state.events.push(GameEvent::WallBounce);
                true
            }
            EdgeContact::Paddle => {
                state.multiplier = BASE_MULTIPLIER;
                state.events.push(GameEvent::PaddleBounce);
                true
            }
            EdgeContact::Missed => {
                lost += 1;
                false
            }
        }
    });

    state.balls = balls;
    if lost > 0 {
        let remaining = state.balls.len();
        state.events.push(GameEvent::BallLost { remaining });
        if remaining == 0 {
            state.finish(GamePhase::Lost);
        }
    }
}

/// Score a struck brick and start its destroy animation
fn hit_brick(state: &mut GameState, col: usize, row: usize) {
    let flash_ticks = state.tuning.flash_ticks;
    let Some(cell) = state.grid.get_mut(col, row) else {
        return;
    };
    cell.state = BrickState::Flashing {
        ticks_left: flash_ticks,
    };
    let popup_pos = Vec2::new(cell.pos.x + BRICK_WIDTH / 2.0, cell.pos.y);

    let (ticks, intensity) = (state.tuning.brick_shake_ticks, state.tuning.brick_shake_intensity);
    state.shake.trigger(ticks, intensity);

    let points = state.multiplier;
    state.score += points;
    state.popups.push(ScorePopup {
        pos: popup_pos,
        points,
        opacity: 1.0,
    });
    state.multiplier += MULTIPLIER_STEP;
    state.events.push(GameEvent::BrickHit { col, row, points });
}

/// Float score popups upward and fade them out
fn update_popups(state: &mut GameState) {
    state.popups.retain_mut(|popup| {
        popup.pos.y -= 0.5;
        popup.opacity -= 0.02;
        popup.opacity > 0.0
    });
}

/// Steer the paddle on the player's behalf
fn autopilot(state: &GameState, input: &mut TickInput) {
    // Most urgent ball: the one that reaches the paddle line first
    let danger = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .min_by(|a, b| {
            ticks_to_paddle(a)
                .partial_cmp(&ticks_to_paddle(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    // Every ball rising through the upper part of the board
    let all_balls_safe = state
        .balls
        .iter()
        .all(|b| b.vel.y < 0.0 && b.pos.y < BOARD_HEIGHT * 0.6);

    let target_pickup = if all_balls_safe {
        state
            .pickups
            .iter()
            .filter(|p| p.pos.y < PADDLE_Y)
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
            .map(|p| p.pos.x)
    } else {
        None
    };

    let target = if let Some(x) = target_pickup {
        x
    } else if let Some(ball) = danger {
        // Hit off-center by a drifting amount so rallies vary
        let time_factor = state.time_ticks as f32 * 0.01;
        let offset = (time_factor.sin() * 0.2 + (time_factor * 0.7).sin() * 0.1) * state.paddle.width;
        predict_landing_x(ball) - offset
    } else {
        state.balls.first().map(|b| b.pos.x).unwrap_or(BOARD_WIDTH / 2.0)
    };

    let speed = state.tuning.paddle_analog_speed.max(f32::EPSILON);
    let axis = ((target - state.paddle.center()) / speed).clamp(-1.0, 1.0);
    input.left = false;
    input.right = false;
    input.axis = if axis.abs() >= AXIS_DEADZONE { axis } else { 0.0 };
}

fn ticks_to_paddle(ball: &Ball) -> f32 {
    (paddle_line(ball.radius) - ball.pos.y) / ball.vel.y
}

/// Where a descending ball will cross the paddle line, folding in side-wall
/// bounces
fn predict_landing_x(ball: &Ball) -> f32 {
    if ball.vel.y <= 0.0 {
        return ball.pos.x;
    }
    let t = ticks_to_paddle(ball).max(0.0);
    let lo = ball.radius;
    let span = (BOARD_WIDTH - 2.0 * ball.radius).max(f32::EPSILON);
    let period = 2.0 * span;
    let travelled = (ball.pos.x + ball.vel.x * t - lo).rem_euclid(period);
    lo + if travelled > span {
        period - travelled
    } else {
        travelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{LevelId, LevelLayout};
    use crate::sim::grid::BrickGrid;
    use crate::sim::state::{PickupKind, Victory};
    use proptest::prelude::*;

    fn playing_with(layout: LevelLayout) -> GameState {
        let mut state = GameState::campaign(42, 10);
        state.take_load_request();
        state.complete_load(Ok(layout));
        state.events.clear();
        state
    }

    fn lone_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        state.balls.clear();
        let id = state.next_entity_id();
        state.balls.push(Ball {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
        });
    }

    #[test]
    fn test_brick_hit_from_below() {
        let mut layout = LevelLayout::empty();
        layout.set(0, 0, true);
        let mut state = playing_with(layout);
        lone_ball(&mut state, Vec2::new(55.0, 91.0), Vec2::new(1.5, -4.0));

        tick(&mut state, &TickInput::default());

        let ball = &state.balls[0];
        assert_eq!(ball.vel, Vec2::new(1.5, 4.0));
        assert_eq!(state.score, 10);
        assert_eq!(state.multiplier, 20);
        assert!(matches!(
            state.grid.get(0, 0).unwrap().state,
            BrickState::Flashing { .. }
        ));
        assert_eq!(state.popups.len(), 1);
        assert_eq!(state.popups[0].text(), "+10");
        assert!(state.shake.active());
        assert!(state.events.contains(&GameEvent::BrickHit {
            col: 0,
            row: 0,
            points: 10
        }));
        // A flashing brick still blocks the clear
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_paddle_bounce_resets_multiplier() {
        let mut state = playing_with(LevelLayout::full());
        state.multiplier = 70;
        let center = state.paddle.center();
        lone_ball(&mut state, Vec2::new(center, paddle_line(BALL_RADIUS) - 3.0), Vec2::new(0.0, 4.0));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.multiplier, BASE_MULTIPLIER);
        assert!(state.balls[0].vel.y < 0.0);
        assert!(state.events.contains(&GameEvent::PaddleBounce));
    }

    #[test]
    fn test_missed_ball_is_removed_then_game_lost() {
        let mut state = playing_with(LevelLayout::full());
        state.score = 70;
        lone_ball(&mut state, Vec2::new(20.0, paddle_line(BALL_RADIUS) - 3.0), Vec2::new(0.0, 4.0));
        let id = state.next_entity_id();
        state.balls.push(Ball {
            id,
            pos: Vec2::new(240.0, 200.0),
            vel: Vec2::new(0.0, -4.0),
            radius: BALL_RADIUS,
        });
        state.paddle.x = 300.0;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 1);
        assert!(state.events.contains(&GameEvent::BallLost { remaining: 1 }));
        assert_eq!(state.phase, GamePhase::Playing);

        lone_ball(&mut state, Vec2::new(20.0, paddle_line(BALL_RADIUS) - 3.0), Vec2::new(0.0, 4.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(state.events.contains(&GameEvent::Lost { score: 70 }));
        assert_eq!(state.highscore, 70);
    }

    #[test]
    fn test_terminal_phase_is_frozen() {
        let mut state = playing_with(LevelLayout::full());
        state.finish(GamePhase::Lost);
        let ball = state.balls[0].clone();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls[0], ball);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_empty_grid_leaves_playing_within_one_tick() {
        let mut state = playing_with(LevelLayout::full());
        state.grid = BrickGrid::new();
        tick(&mut state, &TickInput::default());
        assert_eq!(
            state.phase,
            GamePhase::Transitioning {
                next: 1,
                requested: false
            }
        );
        assert_eq!(state.take_load_request(), Some(LevelId::Campaign(1)));
    }

    #[test]
    fn test_last_falling_brick_clears_custom_level() {
        let mut layout = LevelLayout::empty();
        layout.set(7, 4, true);
        let mut state = GameState::custom(1, "solo");
        state.take_load_request();
        state.complete_load(Ok(layout));
        state.grid.get_mut(7, 4).unwrap().state = BrickState::Flashing { ticks_left: 1 };

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won(Victory::CustomLevelComplete));
    }

    #[test]
    fn test_tenth_brick_drops_one_pickup() {
        let mut state = playing_with(LevelLayout::full());
        state.bonus.bricks_since_last_bonus = 9;
        state.grid.get_mut(3, 2).unwrap().state = BrickState::Flashing { ticks_left: 1 };
        state.grid.get_mut(4, 2).unwrap().state = BrickState::Flashing { ticks_left: 1 };

        tick(&mut state, &TickInput::default());

        assert_eq!(state.pickups.len(), 1);
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupSpawned(_)))
            .count();
        assert_eq!(spawned, 1);
        // Dropped from the first brick to finish, in scan order
        let center = state.grid.get(3, 2).unwrap().bounds().center();
        assert_eq!(state.pickups[0].pos.x, center.x);
    }

    #[test]
    fn test_widen_expiry_event() {
        let mut state = playing_with(LevelLayout::full());
        state.paddle.widen(2.0, 1);
        tick(&mut state, &TickInput::default());
        assert!(state.events.contains(&GameEvent::WidenExpired));
        assert_eq!(state.paddle.width, PADDLE_WIDTH);
    }

    #[test]
    fn test_caught_multiball_adds_balls() {
        let mut state = playing_with(LevelLayout::full());
        let center = state.paddle.center();
        spawn_pickup(&mut state, PickupKind::MultiBall, Vec2::new(center, PADDLE_Y - 6.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 3);
        assert!(state.balls.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_paddle_movement() {
        let mut state = playing_with(LevelLayout::full());
        let x = state.paddle.x;

        let right = TickInput {
            right: true,
            left: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert_eq!(state.paddle.x, x + 5.0);

        // Analog overrides digital
        let analog = TickInput {
            left: true,
            axis: 0.5,
            ..Default::default()
        };
        tick(&mut state, &analog);
        assert_eq!(state.paddle.x, x + 5.0 + 3.5);

        // A centered stick leaves digital in charge
        let centered = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &centered);
        assert_eq!(state.paddle.x, x + 3.5);

        // Small deflections that passed the input deadzone still move
        let gentle = TickInput {
            axis: 0.1,
            ..Default::default()
        };
        tick(&mut state, &gentle);
        let expected = x + 3.5 + 0.1 * state.tuning.paddle_analog_speed;
        assert!((state.paddle.x - expected).abs() < 1e-4);
    }

    #[test]
    fn test_autopilot_chases_descending_ball() {
        let mut state = playing_with(LevelLayout::full());
        lone_ball(&mut state, Vec2::new(420.0, 200.0), Vec2::new(0.0, 4.0));
        let x = state.paddle.x;
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle);
        assert!(state.paddle.x > x);
    }

    #[test]
    fn test_landing_prediction_folds_off_walls() {
        let ball = Ball {
            id: 1,
            pos: Vec2::new(460.0, paddle_line(BALL_RADIUS) - 40.0),
            vel: Vec2::new(4.0, 4.0),
            radius: BALL_RADIUS,
        };
        // 10 ticks to the paddle line; 28px of travel folds back off the right wall
        let x = predict_landing_x(&ball);
        assert!((x - (BOARD_WIDTH - BALL_RADIUS - 28.0)).abs() < 1e-3, "landed at {}", x);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing_with(LevelLayout::full());
        let mut state2 = playing_with(LevelLayout::full());
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                idle_mode: true,
                ..Default::default()
            },
            TickInput {
                axis: -0.8,
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.balls, state2.balls);
        assert_eq!(state1.pickups, state2.pickups);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_score_never_decreases(
            seed in any::<u64>(),
            moves in proptest::collection::vec((any::<bool>(), any::<bool>(), -1.0f32..1.0), 1..400),
        ) {
            let mut state = GameState::campaign(seed, 10);
            state.take_load_request();
            state.complete_load(Ok(LevelLayout::full()));

            let mut last = state.score;
            for (left, right, axis) in moves {
                let multiplier_before = state.multiplier;
                tick(&mut state, &TickInput { left, right, axis, ..Default::default() });
                prop_assert!(state.score >= last);
                let hits = state.events.iter().filter(|e| matches!(e, GameEvent::BrickHit { .. })).count() as u64;
                if state.events.contains(&GameEvent::PaddleBounce) {
                    prop_assert_eq!(state.multiplier % MULTIPLIER_STEP, 0);
                } else if state.phase == GamePhase::Playing {
                    prop_assert_eq!(state.multiplier, multiplier_before + hits * MULTIPLIER_STEP);
                }
                last = state.score;
            }
        }
    }
}
