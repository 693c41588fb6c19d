//! The game frame: one simulation step and one presented picture per call
//!
//! `GameFrame` owns the bullets and the FPS history. The session (tank
//! state, enemy, config) is only borrowed.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::fps::FpsHistory;
use super::map::Map;
use super::surface::{Canvas, SurfaceProvider, TextStyle, colors};
use crate::assets::SpriteSet;
use crate::consts::{BULLET_RADIUS, MAX_SURFACE_RETRIES, TANK_SPRITE_HALF};
use crate::input::TickInput;
use crate::sim::{Bullet, BulletOwner, Bullets, Enemy, EnemyKind, Rect, Session, TickEvents, tick};

pub const USER_GUIDE: &str =
    "Use the MOUSE to aim and the ARROW KEYS to move the TANK. Click to fire. Press ESCAPE to end the game.";
pub const GAME_OVER: &str = "GAME OVER";

const HUD_FONT_SIZE: f32 = 18.0;
const GAME_OVER_FONT_SIZE: f32 = 64.0;

/// How a `render` call went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Draw passes run (more than one after a loss or restore)
    pub draws: u32,
    pub presents: u32,
    /// False if the surface kept failing and the frame was abandoned
    pub completed: bool,
}

pub struct GameFrame {
    sprites: SpriteSet,
    map: Map,
    bullets: Bullets,
    fps: FpsHistory,
    last_render_ms: Option<f64>,
    last_interval_ms: Option<f64>,
    show_fps: bool,
}

impl GameFrame {
    pub fn new(session: &Session, sprites: SpriteSet) -> Self {
        let config = &session.config;
        Self {
            sprites,
            map: Map::design(
                config.map.seed,
                config.window.width,
                config.window.height,
                config.map.tile_size,
            ),
            bullets: Bullets::new(),
            fps: FpsHistory::default(),
            last_render_ms: None,
            last_interval_ms: None,
            show_fps: config.show_fps,
        }
    }

    pub fn bullets(&self) -> &Bullets {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut Bullets {
        &mut self.bullets
    }

    pub fn fps(&self) -> &FpsHistory {
        &self.fps
    }

    /// Advance the simulation by one frame
    pub fn update(&mut self, session: &mut Session, input: &TickInput) -> TickEvents {
        tick(session, &mut self.bullets, input)
    }

    /// Produce one presented frame
    ///
    /// Redraws while the surface reports the back buffer as restored, and
    /// redoes draw + present while it reports the presented buffer as lost.
    /// Both loops give up after `MAX_SURFACE_RETRIES` attempts.
    pub fn render<S: SurfaceProvider>(
        &mut self,
        surface: &mut S,
        session: &Session,
        now_ms: f64,
    ) -> FrameReport {
        self.sample_fps(now_ms);

        let mut report = FrameReport::default();
        for _ in 0..MAX_SURFACE_RETRIES {
            let mut drawn = false;
            for _ in 0..MAX_SURFACE_RETRIES {
                let canvas = surface.acquire_draw_target();
                self.draw(canvas, session);
                report.draws += 1;
                if !surface.contents_restored() {
                    drawn = true;
                    break;
                }
            }
            if !drawn {
                log::warn!("Back buffer kept being restored; dropping frame");
                return report;
            }

            surface.present();
            report.presents += 1;
            if !surface.contents_lost() {
                report.completed = true;
                return report;
            }
        }

        log::warn!(
            "Surface lost {} times in a row; dropping frame",
            MAX_SURFACE_RETRIES
        );
        report
    }

    fn sample_fps(&mut self, now_ms: f64) {
        if let Some(last) = self.last_render_ms {
            let interval = now_ms - last;
            if self.fps.push_interval(interval).is_some() {
                self.last_interval_ms = Some(interval);
            }
        }
        self.last_render_ms = Some(now_ms);
    }

    /// The draw pass; later draws cover earlier ones
    ///
    /// Reads the session but never changes it, so it can be repeated any
    /// number of times for the same frame.
    pub fn draw(&self, canvas: &mut impl Canvas, session: &Session) {
        let state = &session.state;
        let view = canvas.size();

        self.map.draw(canvas, state.camera_y);

        if session.enemy.is_alive() {
            self.draw_enemy(canvas, &session.enemy);
        }

        let tank_top_left = (state.tank_center - TANK_SPRITE_HALF).as_vec2();
        if let Some(body) = &self.sprites.tank_body {
            canvas.draw_sprite(body, tank_top_left, state.tank_body_angle);
        }
        if let Some(gun) = &self.sprites.tank_gun {
            canvas.draw_sprite(gun, tank_top_left, state.gun_angle());
        }
        let center = state.tank_center.as_vec2();
        canvas.fill_oval(Rect::new(center.x, center.y, 10.0, 10.0), colors::RED);

        for bullet in &self.bullets {
            self.draw_bullet(canvas, bullet);
        }

        let hud = TextStyle::new(HUD_FONT_SIZE, colors::WHITE);
        canvas.draw_text(USER_GUIDE, Vec2::new(10.0, (view.y - 10) as f32), &hud);

        if self.show_fps {
            if let Some(line) = self.debug_line(session) {
                let style = TextStyle::new(HUD_FONT_SIZE, colors::CYAN);
                let metrics = canvas.text_metrics(&line, &style);
                let x = (view.x as f32 - metrics.x) / 2.0;
                canvas.draw_text(&line, Vec2::new(x, metrics.y + 50.0), &style);
            }
        }

        if state.game_over {
            let style = TextStyle::new(GAME_OVER_FONT_SIZE, colors::WHITE).bold();
            let metrics = canvas.text_metrics(GAME_OVER, &style);
            let x = (view.x as f32 - metrics.x) / 2.0;
            canvas.draw_text(GAME_OVER, Vec2::new(x, (view.y / 2) as f32), &style);
        }
    }

    fn draw_enemy(&self, canvas: &mut impl Canvas, enemy: &Enemy) {
        match enemy.kind {
            EnemyKind::Stationary => {
                if let Some(body) = &self.sprites.enemy_body {
                    canvas.draw_sprite(body, enemy.pos, enemy.facing);
                }
                if let Some(gun) = &self.sprites.enemy_gun {
                    canvas.draw_sprite(gun, enemy.pos, enemy.facing);
                }
            }
            EnemyKind::MachineGun { gun_angle } => {
                let lamp = Vec2::splat(10.0);
                for offset in [Vec2::new(20.0, 20.0), Vec2::new(-40.0, 20.0)] {
                    canvas.fill_oval(Rect { min: enemy.pos + offset, size: lamp }, colors::RED);
                }
                if let Some(body) = &self.sprites.machine_gun_body {
                    canvas.draw_sprite(body, enemy.pos, 0.0);
                }
                // Turret sprite points up; rotate a quarter turn onto the aim
                if let Some(gun) = &self.sprites.machine_gun_gun {
                    canvas.draw_sprite(gun, enemy.pos + enemy.config.gun_offset, gun_angle + FRAC_PI_2);
                }
            }
        }
    }

    fn draw_bullet(&self, canvas: &mut impl Canvas, bullet: &Bullet) {
        match &self.sprites.bullet {
            Some(sprite) => {
                canvas.draw_sprite(sprite, bullet.pos - sprite.size() / 2.0, bullet.angle());
            }
            None => {
                let color = match bullet.owner {
                    BulletOwner::Player => colors::BULLET,
                    BulletOwner::Enemy => colors::ENEMY_BULLET,
                };
                let bounds = Rect::centered(bullet.pos, Vec2::splat(BULLET_RADIUS * 2.0));
                canvas.fill_oval(bounds, color);
            }
        }
    }

    fn debug_line(&self, session: &Session) -> Option<String> {
        let avg = self.fps.mean()?;
        let interval = self.last_interval_ms?;
        let state = &session.state;
        Some(format!(
            "Average FPS = {:.1} , Last Interval = {} ms, angle = {:.6}, tankX = {}, tankY = {}, aimX = {}, aimY = {}, cameraY = {}",
            avg,
            interval.round() as i64,
            state.gun_angle(),
            state.tank_center.x,
            state.tank_center.y,
            state.aim.x,
            state.aim.y,
            state.camera_y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::names;
    use crate::assets::tests::full_set;
    use crate::config::GameConfig;
    use crate::render::surface::{CommandList, DrawCommand, RecordingSurface};
    use crate::sim::{EnemyConfig, Movement};
    use glam::IVec2;

    fn setup(sprites: SpriteSet) -> (Session, GameFrame, RecordingSurface) {
        let config = GameConfig {
            enemy: EnemyConfig {
                movement: Movement::Stationary,
                ..EnemyConfig::machine_gun()
            },
            ..GameConfig::default()
        };
        let session = Session::new(config).unwrap();
        let frame = GameFrame::new(&session, sprites);
        let surface = RecordingSurface::new(IVec2::new(1280, 720));
        (session, frame, surface)
    }

    /// Index of the first command matching `pred`
    fn position(list: &CommandList, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        list.commands().iter().position(pred).unwrap()
    }

    fn is_sprite(name: &'static str) -> impl Fn(&DrawCommand) -> bool {
        move |c: &DrawCommand| matches!(c, DrawCommand::Sprite { name: n, .. } if n == name)
    }

    fn is_text(prefix: &'static str) -> impl Fn(&DrawCommand) -> bool {
        move |c: &DrawCommand| matches!(c, DrawCommand::Text { text, .. } if text.starts_with(prefix))
    }

    #[test]
    fn test_draw_order() {
        let (mut session, mut frame, mut surface) = setup(full_set());
        session.state.game_over = true;
        frame
            .bullets_mut()
            .fire(Vec2::new(600.0, 100.0), 0.0, 10.0, BulletOwner::Player, 1);

        frame.render(&mut surface, &session, 0.0);
        frame.render(&mut surface, &session, 16.0);
        let list = surface.front().unwrap();

        let map = position(list, |c| matches!(c, DrawCommand::FillRect { .. }));
        let enemy = position(list, is_sprite(names::MACHINE_GUN_BODY));
        let enemy_gun = position(list, is_sprite(names::MACHINE_GUN_GUN));
        let body = position(list, is_sprite(names::TANK_BODY));
        let gun = position(list, is_sprite(names::TANK_GUN));
        let bullet = position(list, is_sprite(names::BULLET));
        let guide = position(list, is_text("Use the MOUSE"));
        let fps = position(list, is_text("Average FPS"));
        let over = position(list, is_text(GAME_OVER));

        let order = [map, enemy, enemy_gun, body, gun, bullet, guide, fps, over];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "order was {:?}", order);
    }

    #[test]
    fn test_tank_sprites_rotated_about_center() {
        let (mut session, frame, _) = setup(full_set());
        session.state.tank_center = IVec2::new(300, 200);
        session.state.aim = IVec2::new(300, 400);
        session.state.tank_body_angle = 0.5;

        let mut canvas = CommandList::new(IVec2::new(1280, 720));
        frame.draw(&mut canvas, &session);

        let sprites: Vec<(String, Vec2, f32)> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { name, top_left, angle } => Some((name.clone(), *top_left, *angle)),
                _ => None,
            })
            .collect();
        let body = sprites.iter().find(|s| s.0 == names::TANK_BODY).unwrap();
        let gun = sprites.iter().find(|s| s.0 == names::TANK_GUN).unwrap();
        assert_eq!(body.1, Vec2::new(210.0, 110.0));
        assert_eq!(body.2, 0.5);
        assert_eq!(gun.1, Vec2::new(210.0, 110.0));
        assert!((gun.2 - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_game_over_overlay_centered() {
        let (mut session, frame, _) = setup(full_set());
        let mut canvas = CommandList::new(IVec2::new(1280, 720));
        frame.draw(&mut canvas, &session);
        assert!(!canvas.texts().any(|t| t == GAME_OVER));

        session.state.game_over = true;
        let mut canvas = CommandList::new(IVec2::new(1280, 720));
        frame.draw(&mut canvas, &session);
        let (pos, style) = canvas
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { text, pos, style } if text == GAME_OVER => Some((*pos, *style)),
                _ => None,
            })
            .unwrap();
        let width = canvas.text_metrics(GAME_OVER, &style).x;
        assert!((pos.x + width / 2.0 - 640.0).abs() < 1e-3);
        assert_eq!(pos.y, 360.0);
        assert!(style.bold);
        assert_eq!(style.size, 64.0);
    }

    #[test]
    fn test_fps_line_needs_two_frames() {
        let (session, mut frame, mut surface) = setup(SpriteSet::default());
        frame.render(&mut surface, &session, 1000.0);
        assert!(!surface.front().unwrap().texts().any(|t| t.starts_with("Average FPS")));

        frame.render(&mut surface, &session, 1020.0);
        let line = surface
            .front()
            .unwrap()
            .texts()
            .find(|t| t.starts_with("Average FPS"))
            .unwrap()
            .to_string();
        assert!(line.starts_with("Average FPS = 50.0 , Last Interval = 20 ms"));
        assert_eq!(frame.fps().len(), 1);
    }

    #[test]
    fn test_fps_hidden_when_disabled() {
        let config = GameConfig {
            show_fps: false,
            ..GameConfig::default()
        };
        let session = Session::new(config).unwrap();
        let mut frame = GameFrame::new(&session, SpriteSet::default());
        let mut surface = RecordingSurface::new(IVec2::new(1280, 720));
        frame.render(&mut surface, &session, 0.0);
        frame.render(&mut surface, &session, 16.0);
        assert!(!surface.front().unwrap().texts().any(|t| t.starts_with("Average FPS")));
        assert_eq!(frame.fps().len(), 1);
    }

    #[test]
    fn test_missing_sprites_still_draw_a_frame() {
        let (session, mut frame, mut surface) = setup(SpriteSet::default());
        frame
            .bullets_mut()
            .fire(Vec2::new(600.0, 100.0), 0.0, 10.0, BulletOwner::Enemy, 1);
        let report = frame.render(&mut surface, &session, 0.0);
        assert!(report.completed);

        let list = surface.front().unwrap();
        assert_eq!(list.sprite_names().count(), 0);
        let bullet_oval = list.commands().iter().any(|c| {
            matches!(c, DrawCommand::FillOval { color, .. } if *color == colors::ENEMY_BULLET)
        });
        assert!(bullet_oval);
        assert!(list.texts().any(|t| t == USER_GUIDE));
    }

    #[test]
    fn test_dead_enemy_not_drawn() {
        let (mut session, frame, _) = setup(full_set());
        session.enemy.take_damage(100);
        let mut canvas = CommandList::new(IVec2::new(1280, 720));
        frame.draw(&mut canvas, &session);
        assert!(!canvas.sprite_names().any(|n| n == names::MACHINE_GUN_BODY));
    }

    #[test]
    fn test_restore_redraws_without_resimulating() {
        let (mut session, mut frame, mut surface) = setup(full_set());
        frame
            .bullets_mut()
            .fire(Vec2::new(100.0, 100.0), 0.0, 10.0, BulletOwner::Player, 1);
        frame.update(&mut session, &TickInput::default());

        surface.inject_restores(2);
        let report = frame.render(&mut surface, &session, 0.0);
        assert_eq!(
            report,
            FrameReport {
                draws: 3,
                presents: 1,
                completed: true
            }
        );
        assert_eq!(frame.bullets().iter().next().unwrap().pos, Vec2::new(110.0, 100.0));
        assert_eq!(session.state.time_ticks, 1);
    }

    #[test]
    fn test_lost_frame_is_redone() {
        let (session, mut frame, mut surface) = setup(full_set());
        surface.inject_losses(1);
        let report = frame.render(&mut surface, &session, 0.0);
        assert_eq!(report.draws, 2);
        assert_eq!(report.presents, 2);
        assert!(report.completed);
        assert_eq!(surface.presents(), 2);
        // One sample per logical frame, however many retries
        frame.render(&mut surface, &session, 10.0);
        assert_eq!(frame.fps().len(), 1);
    }

    #[test]
    fn test_retries_are_bounded() {
        let (session, mut frame, mut surface) = setup(full_set());
        surface.inject_losses(1000);
        let report = frame.render(&mut surface, &session, 0.0);
        assert!(!report.completed);
        assert_eq!(report.presents, MAX_SURFACE_RETRIES);

        let (session, mut frame, mut surface) = setup(full_set());
        surface.inject_restores(1000);
        let report = frame.render(&mut surface, &session, 0.0);
        assert!(!report.completed);
        assert_eq!(report.presents, 0);
        assert_eq!(report.draws, MAX_SURFACE_RETRIES);
    }

    #[test]
    fn test_camera_wraps_past_i32_max() {
        let (mut session, mut frame, mut surface) = setup(full_set());
        session.state.camera_y = i32::MAX - 5;
        let input = TickInput {
            scroll: 10,
            ..TickInput::default()
        };
        frame.update(&mut session, &input);
        assert_eq!(session.state.camera_y, i32::MIN + 4);

        let report = frame.render(&mut surface, &session, 0.0);
        assert!(report.completed);
        let front = surface.front().unwrap();
        assert!(front.commands().iter().any(|c| matches!(c, DrawCommand::FillRect { .. })));
    }

    #[test]
    fn test_update_then_render_moves_bullets() {
        let (mut session, mut frame, mut surface) = setup(full_set());
        session.state.tank_center = IVec2::new(100, 100);
        let fire = TickInput {
            aim_at: Some(IVec2::new(200, 100)),
            fire: true,
            ..Default::default()
        };
        let events = frame.update(&mut session, &fire);
        assert_eq!(events.player_shots, 1);
        for _ in 0..5 {
            frame.update(&mut session, &TickInput::default());
        }
        frame.render(&mut surface, &session, 0.0);

        let bullet = frame.bullets().iter().next().unwrap();
        assert!((bullet.pos - Vec2::new(225.0, 100.0)).length() < 1e-4);
        let drawn = surface
            .front()
            .unwrap()
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Sprite { name, top_left, .. } if name == names::BULLET => Some(*top_left),
                _ => None,
            })
            .unwrap();
        assert_eq!(drawn, Vec2::new(219.0, 94.0));
    }
}
