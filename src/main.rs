//! Tank Arena entry point
//!
//! Runs a headless session: the scripted autopilot plays against the enemy
//! while every frame is drawn into the recording surface.
//!
//! Usage: `tank-arena [config.json] [--frames N] [--seed N] [--dump-frame out.json]`

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use glam::IVec2;

use tank_arena::assets::{DirectoryAssets, SpriteSet};
use tank_arena::input::Autopilot;
use tank_arena::render::{GameFrame, RecordingSurface};
use tank_arena::sim::{LifeState, Session};
use tank_arena::{GameConfig, GameError};

/// Headless Tank Arena session
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; built-in defaults when omitted
    config: Option<PathBuf>,

    /// Frames to simulate and render
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Autopilot seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Write the last presented frame's draw commands here as JSON
    #[arg(long)]
    dump_frame: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), GameError> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    log::info!(
        "{} ({}x{}), {} frames, seed {}",
        config.window.title,
        config.window.width,
        config.window.height,
        args.frames,
        args.seed
    );

    let sprites = SpriteSet::load(&DirectoryAssets::new(&config.assets_dir));
    let view = IVec2::new(config.window.width, config.window.height);

    let mut session = Session::new(config)?;
    let mut frame = GameFrame::new(&session, sprites);
    let mut surface = RecordingSurface::new(view);
    let mut pilot = Autopilot::new(args.seed, view);

    let start = Instant::now();
    let mut dropped = 0u64;
    let mut enemy_hits = 0u32;
    let mut player_hits = 0u32;

    for _ in 0..args.frames {
        let input = pilot.next_input(&session.state, &session.enemy);
        let events = frame.update(&mut session, &input);
        enemy_hits += events.enemy_hits;
        player_hits += events.player_hits;
        if events.enemy_destroyed {
            log::info!("Enemy destroyed at tick {}", session.state.time_ticks);
        }
        if events.game_over {
            log::info!("GAME OVER at tick {}", session.state.time_ticks);
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        if !frame.render(&mut surface, &session, now_ms).completed {
            dropped += 1;
        }
    }

    let enemy = match session.enemy.life() {
        LifeState::Alive => format!("alive ({} hp left)", session.enemy.health_remaining()),
        LifeState::Dead => "destroyed".to_string(),
    };
    log::info!(
        "Ran {} ticks: {} presents, {} dropped, avg FPS {:.1}",
        session.state.time_ticks,
        surface.presents(),
        dropped,
        frame.fps().mean().unwrap_or(0.0)
    );
    log::info!(
        "Enemy {}, {} hits taken; player health {}, {} hits taken; {} bullets in flight",
        enemy,
        enemy_hits,
        session.state.player_health,
        player_hits,
        frame.bullets().len()
    );

    if let Some(path) = &args.dump_frame {
        if let Some(last) = surface.front() {
            let file = std::fs::File::create(path)?;
            serde_json::to_writer_pretty(file, last)?;
            log::info!("Wrote last frame ({} commands) to {}", last.commands().len(), path.display());
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("Tank Arena (headless) starting...");

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
