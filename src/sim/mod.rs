//! Gameplay simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - One step per frame, driven by `tick`
//! - Stable iteration order (bullets keep their firing order)
//! - Tunables come from config structs, never from literals in the step

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, BulletOwner, Bullets, muzzle_point};
pub use collision::{Rect, circle_rect_overlap};
pub use enemy::{Enemy, EnemyConfig, EnemyKind, FireTrigger, LifeState, Movement};
pub use state::GameState;
pub use tick::{Session, TickEvents, apply_input, tick};
