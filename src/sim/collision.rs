//! Collision detection and response
//!
//! Balls are tested against bricks by their bounding square. The axis a ball
//! reflects on is picked by a [`CollisionStrategy`]; walls and the paddle are
//! tested against the ball's projected next position.

use glam::Vec2;

use super::geom::Aabb;
use super::grid::{BrickGrid, BrickState};
use super::state::{Ball, Paddle};
use crate::consts::*;
use crate::tuning::CollisionStrategy;

/// Which velocity components a brick hit inverted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickAxis {
    /// Hit a left/right face: dx inverted
    Horizontal,
    /// Hit a top/bottom face: dy inverted
    Vertical,
    /// Corner hit: both inverted
    Both,
}

/// First active brick the ball overlaps, in column-major scan order
pub fn find_brick_hit(ball: &Ball, grid: &BrickGrid) -> Option<(usize, usize)> {
    let ball_box = ball.bounds();
    grid.iter()
        .find(|cell| cell.state == BrickState::Active && ball_box.overlaps(&cell.bounds()))
        .map(|cell| (cell.col, cell.row))
}

/// Reflect a ball off a brick it overlaps
pub fn resolve_ball_brick(
    ball: &mut Ball,
    brick: &Aabb,
    strategy: CollisionStrategy,
    nudge: f32,
) -> BrickAxis {
    match strategy {
        CollisionStrategy::OverlapMagnitude => resolve_by_overlap(ball, brick, nudge),
        CollisionStrategy::PreviousPosition => resolve_by_previous_position(ball, brick),
    }
}

/// Smaller overlap wins; the ball is placed just outside the brick on that axis
fn resolve_by_overlap(ball: &mut Ball, brick: &Aabb, nudge: f32) -> BrickAxis {
    let overlap = ball.bounds().overlap(brick);
    let center = brick.center();
    let r = ball.radius;

    let axis = if overlap.x < overlap.y {
        BrickAxis::Horizontal
    } else if overlap.y < overlap.x {
        BrickAxis::Vertical
    } else {
        BrickAxis::Both
    };

    if matches!(axis, BrickAxis::Horizontal | BrickAxis::Both) {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = if exits_positive(ball.vel.x, ball.pos.x, center.x) {
            brick.max.x + r + nudge
        } else {
            brick.min.x - r - nudge
        };
    }
    if matches!(axis, BrickAxis::Vertical | BrickAxis::Both) {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = if exits_positive(ball.vel.y, ball.pos.y, center.y) {
            brick.max.y + r + nudge
        } else {
            brick.min.y - r - nudge
        };
    }
    axis
}

/// Side of the brick a ball leaves by: along its new velocity, or by which
/// half of the brick it is in when that component is zero
#[inline]
fn exits_positive(new_vel: f32, pos: f32, brick_center: f32) -> bool {
    if new_vel != 0.0 {
        new_vel > 0.0
    } else {
        pos >= brick_center
    }
}

/// Reflect on the axis the previous position had already cleared; no push-out
fn resolve_by_previous_position(ball: &mut Ball, brick: &Aabb) -> BrickAxis {
    let prev = Aabb::around_circle(ball.previous_pos(), ball.radius);
    let collided_horizontally = prev.clear_on_x(brick);
    let collided_vertically = prev.clear_on_y(brick);

    let axis = match (collided_horizontally, collided_vertically) {
        (true, false) => BrickAxis::Horizontal,
        (false, true) => BrickAxis::Vertical,
        _ => BrickAxis::Both,
    };
    match axis {
        BrickAxis::Horizontal => ball.vel.x = -ball.vel.x,
        BrickAxis::Vertical => ball.vel.y = -ball.vel.y,
        BrickAxis::Both => ball.vel = -ball.vel,
    }
    axis
}

/// Exit velocity off the paddle: angle set by where the ball hit, speed kept,
/// always heading up
pub fn paddle_bounce(vel: Vec2, ball_x: f32, paddle: &Paddle, max_angle: f32) -> Vec2 {
    let hit = ((ball_x - paddle.center()) / (paddle.width / 2.0)).clamp(-1.0, 1.0);
    let angle = hit * max_angle;
    let speed = vel.length();
    Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}

/// What a ball touched at the board edges this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeContact {
    /// Nothing below or above
    Clear,
    /// Bounced off the score header
    Ceiling,
    /// Bounced off the paddle
    Paddle,
    /// Crossed the paddle line outside the paddle: out of play
    Missed,
}

/// Result of [`resolve_edges`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeResult {
    pub side_wall: bool,
    pub contact: EdgeContact,
}

/// The y a ball's center may not pass without meeting the paddle
#[inline]
pub fn paddle_line(radius: f32) -> f32 {
    BOARD_HEIGHT - PADDLE_BOTTOM_MARGIN - radius
}

/// Bounce a ball off the side walls, the header and the paddle, judged by
/// where it would be next tick
pub fn resolve_edges(ball: &mut Ball, paddle: &Paddle, max_angle: f32) -> EdgeResult {
    let r = ball.radius;
    let next = ball.pos + ball.vel;

    let side_wall = next.x > BOARD_WIDTH - r || next.x < r;
    if side_wall {
        ball.vel.x = -ball.vel.x;
    }

    let contact = if next.y < HEADER_HEIGHT + r {
        ball.vel.y = -ball.vel.y;
        EdgeContact::Ceiling
    } else if next.y > paddle_line(r) {
        if paddle.spans(ball.pos.x) {
            ball.vel = paddle_bounce(ball.vel, ball.pos.x, paddle, max_angle);
            EdgeContact::Paddle
        } else {
            EdgeContact::Missed
        }
    } else {
        EdgeContact::Clear
    };

    EdgeResult { side_wall, contact }
}

/// A pickup is caught when it overlaps the paddle band vertically and its
/// center is over the paddle
pub fn pickup_caught(pickup: &Aabb, paddle: &Paddle) -> bool {
    let band = paddle.bounds();
    pickup.max.y >= band.min.y && pickup.min.y <= band.max.y && paddle.spans(pickup.center().x)
}
