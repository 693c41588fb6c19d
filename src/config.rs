//! Game configuration
//!
//! Loaded once at startup from an optional JSON file. Missing fields fall
//! back to the defaults below.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BULLET_SPEED, GAME_HEIGHT, GAME_WIDTH, MUZZLE_OFFSET};
use crate::error::GameError;
use crate::sim::EnemyConfig;
use crate::sim::collision::Rect;

/// Largest accepted window dimension
const MAX_WINDOW_SIZE: i32 = 16_384;

/// Window title and fixed resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tank Arena".to_string(),
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
        }
    }
}

impl WindowConfig {
    /// Play area; bullets leaving it are discarded
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

/// Player tank tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub spawn: IVec2,
    pub health: u32,
    /// Muzzle distance from the tank center
    pub muzzle_offset: f32,
    pub bullet_speed: f32,
    pub bullet_damage: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: IVec2::new(GAME_WIDTH / 4, GAME_HEIGHT / 2),
            health: 5,
            muzzle_offset: MUZZLE_OFFSET,
            bullet_speed: BULLET_SPEED,
            bullet_damage: 1,
        }
    }
}

/// Background map layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Seed for the tile layout
    pub seed: u64,
    pub tile_size: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: 0x7a4b,
            tile_size: 80,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub map: MapConfig,
    /// Directory holding the sprite PNGs
    pub assets_dir: PathBuf,
    /// Show the FPS/debug line
    pub show_fps: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            map: MapConfig::default(),
            assets_dir: PathBuf::from("assets"),
            show_fps: true,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let (w, h) = (self.window.width, self.window.height);
        if w <= 0 || h <= 0 || w > MAX_WINDOW_SIZE || h > MAX_WINDOW_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "window size must be within 1..={}, got {}x{}",
                MAX_WINDOW_SIZE, w, h
            )));
        }
        if self.player.health == 0 {
            return Err(GameError::InvalidConfig("player health must be non-zero".into()));
        }
        if !(self.player.bullet_speed > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "player bullet speed must be positive, got {}",
                self.player.bullet_speed
            )));
        }
        if self.map.tile_size <= 0 || self.map.tile_size > w.max(h) {
            return Err(GameError::InvalidConfig(format!(
                "map tile size must be within 1..={}, got {}",
                w.max(h),
                self.map.tile_size
            )));
        }
        self.enemy.validate()
    }
}
