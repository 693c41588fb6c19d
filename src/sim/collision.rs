//! Collision detection for bullets and hit-boxes
//!
//! Everything in the arena is either a small circle (bullets) or an
//! axis-aligned rectangle (tanks, screen bounds). Checks are discrete
//! overlaps at the current position; a bullet fast enough to clear a thin
//! target in one frame can tunnel through it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Point on (or inside) the rectangle nearest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }
}

/// Check if a circle overlaps a rectangle
///
/// Uses the closest point on the rectangle to the circle center, so corners
/// are handled exactly. A circle whose center lies inside the rectangle
/// always overlaps.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}
