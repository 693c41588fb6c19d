//! Tank Arena - a top-down tank arcade demo
//!
//! Core modules:
//! - `sim`: Gameplay simulation (tank state, bullets, enemy script, collisions)
//! - `render`: Frame loop, draw-target contract, map and HUD
//! - `assets`: Sprite loading through a pluggable provider
//! - `input`: Per-frame input record and the scripted demo pilot
//! - `config`: Data-driven game tunables

pub mod assets;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod sim;

pub use config::GameConfig;
pub use error::GameError;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// 720p game resolution
    pub const GAME_HEIGHT: i32 = 720;
    /// Wide aspect ratio (16:9)
    pub const GAME_WIDTH: i32 = 16 * GAME_HEIGHT / 9;

    /// Distance from tank center to the gun muzzle
    pub const MUZZLE_OFFSET: f32 = 75.0;
    /// Tank sprites are drawn this far up/left of the tank center
    pub const TANK_SPRITE_HALF: i32 = 90;
    /// Side of the square player hit-box (centered on the tank)
    pub const TANK_HITBOX_SIZE: i32 = 150;

    /// Player bullet speed (pixels per frame)
    pub const BULLET_SPEED: f32 = 10.0;
    /// Collision radius of every bullet
    pub const BULLET_RADIUS: f32 = 5.0;

    /// Rolling FPS history length
    pub const FPS_HISTORY_CAPACITY: usize = 100;
    /// Maximum draw/present retries per frame when the surface is lost
    pub const MAX_SURFACE_RETRIES: u32 = 8;
}

/// Heading (radians) from one point toward another
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Integer screen point to float world point
#[inline]
pub fn to_world(p: IVec2) -> Vec2 {
    p.as_vec2()
}
