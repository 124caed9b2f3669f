//! Axis-aligned rectangle overlap

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Obstacle;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap on both axes. Shared edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Index of the first obstacle overlapping `target`, if any
pub fn first_collision(target: &Rect, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().position(|o| target.overlaps(&o.rect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        let b = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        // Right edge touches
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 20.0, 20.0)));
        // Bottom edge touches
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 20.0, 20.0)));
        // Corner touches
        assert!(!a.overlaps(&Rect::new(20.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_contained_rect_collides() {
        let outer = Rect::new(50.0, 290.0, 180.0, 10.0);
        let inner = Rect::new(100.0, 292.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
    }

    fn interval_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
        a0 < b1 && b0 < a1
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_projections(
            ax in -100i32..100, ay in -100i32..100, aw in 1i32..50, ah in 1i32..50,
            bx in -100i32..100, by in -100i32..100, bw in 1i32..50, bh in 1i32..50,
        ) {
            // Integer coordinates make edge equality reachable
            let a = Rect::new(ax as f32, ay as f32, aw as f32, ah as f32);
            let b = Rect::new(bx as f32, by as f32, bw as f32, bh as f32);
            let expected = interval_overlap(a.x, a.right(), b.x, b.right())
                && interval_overlap(a.y, a.bottom(), b.y, b.bottom());
            prop_assert_eq!(a.overlaps(&b), expected);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
