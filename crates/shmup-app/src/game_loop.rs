//! Game loop thread — steps the session at the nominal tick rate.
//!
//! The game host is created inside this thread because it's cleaner for
//! ownership. Commands arrive via an `mpsc` channel. Snapshots are stored in
//! shared state for polling by the main thread.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use shmup_core::commands::SessionCommand;
use shmup_core::config::SessionConfig;
use shmup_core::constants::{TICK_DURATION, TICK_RATE};
use shmup_core::events::SessionEvent;
use shmup_core::state::SessionSnapshot;
use shmup_sim::host::{ConfigSceneLoader, PlayArea, SceneError};
use shmup_sim::Game;

use crate::state::{GameLoopCommand, RunSummary, SharedSnapshot};

/// How the loop is driven.
#[derive(Debug, Clone, Default)]
pub struct LoopOptions {
    /// Sleep between ticks to match wall-clock time. Otherwise run flat out.
    pub realtime: bool,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Destroy every enemy that reaches the middle of the screen, standing
    /// in for a hero that never misses.
    pub autopilot: bool,
    /// Kill the hero once this much simulated time has passed.
    pub hero_dies_at: Option<Duration>,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the run summary.
pub fn spawn_game_loop(
    config: SessionConfig,
    play_area: PlayArea,
    options: LoopOptions,
    latest_snapshot: SharedSnapshot,
) -> io::Result<(
    mpsc::Sender<GameLoopCommand>,
    JoinHandle<Result<RunSummary, SceneError>>,
)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("shmup-game-loop".into())
        .spawn(move || run_game_loop(config, play_area, &options, &cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the tick limit, a Shutdown command, or channel
/// disconnect.
pub fn run_game_loop(
    config: SessionConfig,
    play_area: PlayArea,
    options: &LoopOptions,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
) -> Result<RunSummary, SceneError> {
    let scene = config.initial_scene.clone();
    let mut game = Game::new(ConfigSceneLoader::single(config, play_area), &scene)?;
    let mut summary = RunSummary::default();
    let hero_death_tick = options.hero_dies_at.map(tick_at);
    let mut hero_dead = false;
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Session(cmd)) => game.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    return Ok(finish(summary, game.reloads()));
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        if options.max_ticks.is_some_and(|max| summary.ticks >= max) {
            return Ok(finish(summary, game.reloads()));
        }

        // 2. Scripted hero death
        if !hero_dead && hero_death_tick.is_some_and(|tick| summary.ticks >= tick) {
            game.queue_command(SessionCommand::HeroDied);
            hero_dead = true;
        }

        // 3. Advance one tick
        let snapshot = game.advance(TICK_DURATION)?;
        summary.ticks += 1;
        tally(&mut summary, &snapshot);

        if options.autopilot {
            for command in autopilot_commands(&snapshot) {
                game.queue_command(command);
            }
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick
        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind — reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }
}

/// First tick at or after simulated time `at`.
fn tick_at(at: Duration) -> u64 {
    (at.as_secs_f64() * TICK_RATE as f64).ceil() as u64
}

fn finish(mut summary: RunSummary, reloads: u32) -> RunSummary {
    summary.scene_reloads = reloads;
    info!(?summary, "game loop stopped");
    summary
}

/// Destroy commands for every enemy at or below the middle of the screen.
fn autopilot_commands(snapshot: &SessionSnapshot) -> Vec<SessionCommand> {
    snapshot
        .enemies
        .iter()
        .filter(|enemy| enemy.position.y <= 0.0)
        .map(|enemy| SessionCommand::DestroyEnemy {
            entity_bits: enemy.entity_bits,
        })
        .collect()
}

fn tally(summary: &mut RunSummary, snapshot: &SessionSnapshot) {
    for event in &snapshot.events {
        match event {
            SessionEvent::EnemySpawned { .. } => summary.enemies_spawned += 1,
            SessionEvent::EnemyDestroyed { .. } => summary.enemies_destroyed += 1,
            SessionEvent::EnemyEscaped { .. } => summary.enemies_escaped += 1,
            SessionEvent::PowerUpSpawned { weapon_type, .. } => {
                summary.power_ups_spawned += 1;
                debug!(?weapon_type, "power-up on the field");
            }
            SessionEvent::PowerUpExpired { .. } => summary.power_ups_expired += 1,
            SessionEvent::RestartScheduled { .. } | SessionEvent::SceneReloadRequested { .. } => {}
        }
    }
}
