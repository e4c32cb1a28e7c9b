//! Axis-aligned boxes
//!
//! Balls are tested against bricks and the paddle by their bounding square,
//! not as true circles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (y grows downward, like the canvas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Box centered on a point
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounding square of a circle
    #[inline]
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, Vec2::splat(radius))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    /// Extent of the intersection on each axis (negative when separated)
    #[inline]
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Whether this box lies entirely to one side of `other` on x
    #[inline]
    pub fn clear_on_x(&self, other: &Aabb) -> bool {
        self.max.x <= other.min.x || self.min.x >= other.max.x
    }

    /// Whether this box lies entirely above or below `other`
    #[inline]
    pub fn clear_on_y(&self, other: &Aabb) -> bool {
        self.max.y <= other.min.y || self.min.y >= other.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        assert!(a.clear_on_x(&b));
        assert!(!a.clear_on_y(&b));
    }

    #[test]
    fn test_overlap_extent() {
        let brick = Aabb::from_pos_size(Vec2::new(30.0, 60.0), Vec2::new(50.0, 20.0));
        let ball = Aabb::around_circle(Vec2::new(55.0, 87.0), 8.0);
        assert!(ball.overlaps(&brick));
        let overlap = ball.overlap(&brick);
        assert!((overlap.x - 16.0).abs() < 1e-4);
        assert!((overlap.y - 1.0).abs() < 1e-4);
    }
}
