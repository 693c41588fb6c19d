//! Player-side game state
//!
//! Written by the input layer, read by the simulation step and the renderer.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{GAME_HEIGHT, GAME_WIDTH, TANK_HITBOX_SIZE};
use crate::{heading, to_world};

/// Shared snapshot of the player tank and camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Tank center (screen pixels)
    pub tank_center: IVec2,
    /// Aim point (mouse position)
    pub aim: IVec2,
    /// Hull facing (radians)
    pub tank_body_angle: f32,
    /// Vertical scroll of the background map
    pub camera_y: i32,
    pub player_health: u32,
    /// Simulation frames elapsed
    pub time_ticks: u64,
    pub game_over: bool,
}

impl GameState {
    pub fn new(tank_center: IVec2, player_health: u32) -> Self {
        Self {
            tank_center,
            aim: tank_center + IVec2::new(1, 0),
            tank_body_angle: 0.0,
            camera_y: 0,
            player_health,
            time_ticks: 0,
            game_over: false,
        }
    }

    /// Turret angle toward the aim point
    ///
    /// Derived from the current tank and aim positions every time it is
    /// asked for; nothing caches it between frames.
    pub fn gun_angle(&self) -> f32 {
        heading(to_world(self.tank_center), to_world(self.aim))
    }

    /// Player hit-box: fixed-size square centered on the tank
    pub fn tank_hitbox(&self) -> Rect {
        Rect::centered(
            to_world(self.tank_center),
            Vec2::splat(TANK_HITBOX_SIZE as f32),
        )
    }

    /// Move the tank, keeping its center on screen
    pub fn move_tank(&mut self, delta: IVec2) {
        let max = IVec2::new(GAME_WIDTH, GAME_HEIGHT);
        self.tank_center = self.tank_center.saturating_add(delta).clamp(IVec2::ZERO, max);
    }

    /// Apply enemy fire; returns true when this hit ends the game
    pub fn take_hit(&mut self, damage: u32) -> bool {
        if self.game_over {
            return false;
        }
        self.player_health = self.player_health.saturating_sub(damage);
        if self.player_health == 0 {
            self.game_over = true;
            return true;
        }
        false
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(IVec2::new(GAME_WIDTH / 4, GAME_HEIGHT / 2), 5)
    }
}
