//! Scripted enemy tanks
//!
//! An enemy runs a fixed movement script and, for the machine-gun variant,
//! fires at the player on a countdown. Enemies are never removed: a
//! destroyed enemy just flips to `LifeState::Dead` and stops doing anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletOwner, muzzle_point};
use super::collision::Rect;
use crate::error::GameError;
use crate::heading;

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Plain target: drawn and hittable, never fires
    Stationary,
    /// Carries a turret that tracks the player and fires on the trigger
    MachineGun {
        /// Current turret angle (radians)
        gun_angle: f32,
    },
}

impl EnemyKind {
    pub fn machine_gun() -> Self {
        EnemyKind::MachineGun { gun_angle: 0.0 }
    }

    #[inline]
    pub fn fires(&self) -> bool {
        matches!(self, EnemyKind::MachineGun { .. })
    }
}

/// Movement script
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    Stationary,
    /// Back and forth along the facing axis, `span` pixels from the spawn point
    Patrol { span: f32 },
}

/// All enemy tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub kind: EnemyKind,
    /// Sprite top-left at spawn
    pub spawn: Vec2,
    /// Facing angle (radians); also the patrol axis
    pub facing: f32,
    pub movement: Movement,
    /// Pixels per frame
    pub speed: f32,
    pub health: u32,
    /// Hit-box size (anchored at the sprite top-left)
    pub size: Vec2,
    /// Frames between trigger pulls
    pub fire_interval: u32,
    /// Target must be this close to the enemy center for a trigger pull to fire
    pub fire_range: f32,
    pub bullet_speed: f32,
    pub bullet_damage: u32,
    /// Turret sprite position relative to the body top-left
    pub gun_offset: Vec2,
}

impl EnemyConfig {
    /// Patrolling machine-gun tank
    pub fn machine_gun() -> Self {
        Self {
            kind: EnemyKind::machine_gun(),
            spawn: Vec2::new(500.0, 300.0),
            facing: 0.0,
            movement: Movement::Patrol { span: 150.0 },
            speed: 0.1,
            health: 8,
            size: Vec2::new(80.0, 75.0),
            fire_interval: 200,
            fire_range: 75.0,
            bullet_speed: 10.0,
            bullet_damage: 1,
            gun_offset: Vec2::new(-40.0, 20.0),
        }
    }

    /// Target parked at a fixed spot
    pub fn stationary() -> Self {
        Self {
            kind: EnemyKind::Stationary,
            spawn: Vec2::new(500.0, 500.0),
            movement: Movement::Stationary,
            ..Self::machine_gun()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.speed > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "enemy speed must be positive, got {}",
                self.speed
            )));
        }
        if self.fire_interval == 0 {
            return Err(GameError::InvalidConfig(
                "enemy fire interval must be at least one frame".into(),
            ));
        }
        if self.health == 0 {
            return Err(GameError::InvalidConfig("enemy health must be non-zero".into()));
        }
        if !(self.bullet_speed > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "enemy bullet speed must be positive, got {}",
                self.bullet_speed
            )));
        }
        if !(self.fire_range >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "enemy fire range must not be negative, got {}",
                self.fire_range
            )));
        }
        if let Movement::Patrol { span } = self.movement {
            if !(span >= 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "patrol span must not be negative, got {}",
                    span
                )));
            }
        }
        Ok(())
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self::machine_gun()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
}

/// Countdown gating periodic fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireTrigger {
    pub interval: u32,
    pub remaining: u32,
}

impl FireTrigger {
    pub fn new(interval: u32) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Count down one frame; true when the trigger is pulled (then rearms)
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.interval;
            true
        } else {
            false
        }
    }
}

/// An enemy instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub config: EnemyConfig,
    /// Sprite top-left
    pub pos: Vec2,
    pub facing: f32,
    pub trigger: FireTrigger,
    life: LifeState,
    damage_taken: u32,
    /// Distance travelled from spawn along the patrol axis
    patrol_offset: f32,
    /// +1 outbound, -1 returning
    patrol_dir: f32,
}

impl Enemy {
    pub fn new(config: EnemyConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            kind: config.kind,
            pos: config.spawn,
            facing: config.facing,
            trigger: FireTrigger::new(config.fire_interval),
            life: LifeState::Alive,
            damage_taken: 0,
            patrol_offset: 0.0,
            patrol_dir: 1.0,
            config,
        })
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    #[inline]
    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn damage_taken(&self) -> u32 {
        self.damage_taken
    }

    pub fn health_remaining(&self) -> u32 {
        self.config.health.saturating_sub(self.damage_taken)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.config.size / 2.0
    }

    pub fn hitbox(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.config.size,
        }
    }

    /// Advance one frame: movement script, turret tracking, trigger
    ///
    /// Returns the bullet fired this frame, if any. Dead enemies do nothing.
    pub fn tick(&mut self, target: Vec2) -> Option<Bullet> {
        if !self.is_alive() {
            return None;
        }

        self.step_movement();

        let center = self.center();
        let aim = heading(center, target);
        if let EnemyKind::MachineGun { ref mut gun_angle } = self.kind {
            *gun_angle = aim;
        }

        if !self.trigger.tick() || !self.kind.fires() {
            return None;
        }
        if center.distance(target) > self.config.fire_range {
            return None;
        }

        let origin = muzzle_point(center, aim, self.config.size.x / 2.0);
        log::debug!("Enemy fires from ({:.0}, {:.0}) at angle {:.3}", origin.x, origin.y, aim);
        Some(Bullet::new(
            origin,
            aim,
            self.config.bullet_speed,
            BulletOwner::Enemy,
            self.config.bullet_damage,
        ))
    }

    fn step_movement(&mut self) {
        let Movement::Patrol { span } = self.config.movement else {
            return;
        };

        self.patrol_offset += self.patrol_dir * self.config.speed;
        if self.patrol_offset >= span {
            self.patrol_offset = span;
            self.patrol_dir = -1.0;
        } else if self.patrol_offset <= 0.0 {
            self.patrol_offset = 0.0;
            self.patrol_dir = 1.0;
        }
        self.pos = self.config.spawn + crate::direction(self.facing) * self.patrol_offset;
    }

    /// Apply damage; returns true on the frame the enemy dies
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.damage_taken = self.damage_taken.saturating_add(amount);
        if self.damage_taken >= self.config.health {
            self.life = LifeState::Dead;
            log::info!("Enemy destroyed after {} damage", self.damage_taken);
            return true;
        }
        false
    }
}
