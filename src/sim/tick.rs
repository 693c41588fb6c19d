//! Per-frame simulation step
//!
//! Advances the session exactly once per frame: input, enemy script,
//! bullets, collisions, pruning.

use super::bullet::{Bullet, BulletOwner, Bullets, muzzle_point};
use super::enemy::Enemy;
use super::state::GameState;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::TickInput;
use crate::to_world;

/// Top-level owner of everything the frame loop only borrows
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub state: GameState,
    pub enemy: Enemy,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let state = GameState::new(config.player.spawn, config.player.health);
        let enemy = Enemy::new(config.enemy.clone())?;
        Ok(Self {
            config,
            state,
            enemy,
        })
    }

    /// Player shot from the current muzzle point along the current gun angle
    pub fn player_shot(&self) -> Bullet {
        let player = &self.config.player;
        let angle = self.state.gun_angle();
        let origin = muzzle_point(to_world(self.state.tank_center), angle, player.muzzle_offset);
        Bullet::new(
            origin,
            angle,
            player.bullet_speed,
            BulletOwner::Player,
            player.bullet_damage,
        )
    }
}

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub player_shots: u32,
    pub enemy_shots: u32,
    /// Player bullets that hit the enemy
    pub enemy_hits: u32,
    /// Enemy bullets that hit the player
    pub player_hits: u32,
    pub enemy_destroyed: bool,
    pub game_over: bool,
    /// Bullets dropped this frame
    pub pruned: usize,
}

/// Write one frame of input into the game state
pub fn apply_input(state: &mut GameState, input: &TickInput) {
    state.move_tank(input.move_by);
    if let Some(aim) = input.aim_at {
        state.aim = aim;
    }
    if let Some(angle) = input.body_angle {
        state.tank_body_angle = angle;
    }
    state.camera_y = state.camera_y.wrapping_add(input.scroll);
}

/// Advance the session by one frame
///
/// Once the game is over the whole simulation is frozen: controls, enemy
/// script and bullets all stop. Only rendering carries on.
pub fn tick(session: &mut Session, bullets: &mut Bullets, input: &TickInput) -> TickEvents {
    let mut events = TickEvents::default();
    if session.state.game_over {
        return events;
    }

    apply_input(&mut session.state, input);
    session.state.time_ticks += 1;

    let mut spawned: Vec<Bullet> = Vec::new();
    if input.fire {
        spawned.push(session.player_shot());
        events.player_shots += 1;
    }

    let target = to_world(session.state.tank_center);
    if let Some(shot) = session.enemy.tick(target) {
        spawned.push(shot);
        events.enemy_shots += 1;
    }

    let bounds = session.config.window.bounds();
    for bullet in bullets.iter_mut() {
        bullet.advance();
        if bullet.check_bounds(&bounds) {
            continue;
        }

        match bullet.owner {
            BulletOwner::Player => {
                if session.enemy.is_alive() && bullet.check_hit(&session.enemy.hitbox()) {
                    events.enemy_hits += 1;
                    if session.enemy.take_damage(bullet.damage) {
                        events.enemy_destroyed = true;
                    }
                }
            }
            BulletOwner::Enemy => {
                if bullet.check_hit(&session.state.tank_hitbox()) {
                    events.player_hits += 1;
                    if session.state.take_hit(bullet.damage) {
                        log::info!("Player destroyed at tick {}", session.state.time_ticks);
                        events.game_over = true;
                    }
                }
            }
        }
    }
    events.pruned = bullets.prune();

    // New shots appear at the muzzle and start moving next frame
    for bullet in spawned {
        bullets.push(bullet);
    }

    events
}
