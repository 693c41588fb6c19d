//! Input layer contract
//!
//! The platform (or the demo autopilot) fills one `TickInput` per frame;
//! the simulation never polls devices itself.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{Enemy, GameState};

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Tank movement this frame (arrow keys / WASD)
    pub move_by: IVec2,
    /// New aim point (mouse position)
    pub aim_at: Option<IVec2>,
    /// New hull facing (radians)
    pub body_angle: Option<f32>,
    /// Map scroll delta
    pub scroll: i32,
    /// Left click
    pub fire: bool,
}

/// Scripted pilot for headless runs
///
/// Drives toward a random waypoint, keeps the gun on the enemy and fires in
/// short bursts. Seeded, so a run is reproducible.
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    waypoint: IVec2,
    bounds: IVec2,
    speed: i32,
    cooldown: u32,
}

impl Autopilot {
    pub fn new(seed: u64, bounds: IVec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let waypoint = random_point(&mut rng, bounds);
        Self {
            rng,
            waypoint,
            bounds,
            speed: 4,
            cooldown: 0,
        }
    }

    pub fn next_input(&mut self, state: &GameState, enemy: &Enemy) -> TickInput {
        let to_waypoint = self.waypoint - state.tank_center;
        if to_waypoint.abs().max_element() <= self.speed {
            self.waypoint = random_point(&mut self.rng, self.bounds);
        }
        let move_by = to_waypoint.clamp(IVec2::splat(-self.speed), IVec2::splat(self.speed));

        let aim = if enemy.is_alive() {
            enemy.center().as_ivec2()
        } else {
            self.waypoint
        };

        let fire = if self.cooldown > 0 {
            self.cooldown -= 1;
            false
        } else if enemy.is_alive() && self.rng.random_bool(0.25) {
            self.cooldown = self.rng.random_range(6..20);
            true
        } else {
            false
        };

        let body_angle = (move_by != IVec2::ZERO)
            .then(|| (move_by.y as f32).atan2(move_by.x as f32));

        TickInput {
            move_by,
            aim_at: Some(aim),
            body_angle,
            scroll: 1,
            fire,
        }
    }
}

fn random_point(rng: &mut Pcg32, bounds: IVec2) -> IVec2 {
    IVec2::new(
        rng.random_range(0..bounds.x.max(1)),
        rng.random_range(0..bounds.y.max(1)),
    )
}
