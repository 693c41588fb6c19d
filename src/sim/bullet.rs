//! Projectiles
//!
//! Bullets fly in straight lines: the heading is fixed at construction and
//! only the position changes afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circle_rect_overlap};
use crate::consts::BULLET_RADIUS;
use crate::direction;

/// Who fired a bullet (decides what it can hit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A single in-flight projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Center position
    pub pos: Vec2,
    /// Pixels per frame
    pub speed: f32,
    pub owner: BulletOwner,
    /// Damage dealt on hit
    pub damage: u32,
    angle: f32,
    removed: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, angle: f32, speed: f32, owner: BulletOwner, damage: u32) -> Self {
        Self {
            pos,
            speed,
            owner,
            damage,
            angle,
            removed: false,
        }
    }

    /// Heading in radians (immutable)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Per-frame displacement
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        direction(self.angle) * self.speed
    }

    /// Advance one frame along the heading
    pub fn advance(&mut self) {
        self.pos += self.velocity();
    }

    /// Mark removed once the center leaves the play area
    pub fn check_bounds(&mut self, bounds: &Rect) -> bool {
        if !bounds.contains(self.pos) {
            self.removed = true;
        }
        self.removed
    }

    /// Test against a hit-box; a hit marks the bullet removed
    ///
    /// Removed bullets never hit anything, so a bullet deals damage at most once.
    pub fn check_hit(&mut self, target: &Rect) -> bool {
        if self.removed {
            return false;
        }
        if circle_rect_overlap(self.pos, BULLET_RADIUS, target) {
            self.removed = true;
            return true;
        }
        false
    }
}

/// Spawn point for a shot: `offset` pixels from `center` along `angle`,
/// truncated to whole pixels
pub fn muzzle_point(center: Vec2, angle: f32, offset: f32) -> Vec2 {
    (center + direction(angle) * offset).trunc()
}

/// Active bullet collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bullets {
    items: Vec<Bullet>,
}

impl Bullets {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Fire a new bullet (no cap on how many can be in flight)
    pub fn fire(&mut self, origin: Vec2, angle: f32, speed: f32, owner: BulletOwner, damage: u32) {
        self.items.push(Bullet::new(origin, angle, speed, owner, damage));
    }

    pub fn push(&mut self, bullet: Bullet) {
        self.items.push(bullet);
    }

    /// Drop every bullet flagged as removed, keeping the rest in order
    pub fn prune(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|b| !b.is_removed());
        before - self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bullet> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bullet> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Bullets {
    type Item = &'a Bullet;
    type IntoIter = std::slice::Iter<'a, Bullet>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
