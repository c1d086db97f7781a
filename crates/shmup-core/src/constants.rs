//! Session constants and default tuning parameters.

use std::time::Duration;

/// Nominal step rate of the game loop (Hz).
pub const TICK_RATE: u32 = 60;

/// Simulated duration of one nominal step.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

// --- Scene ---

/// Scene reloaded to restart the game.
pub const INITIAL_SCENE: &str = "__Scene_0";

/// Default camera half width (orthographic size * aspect).
pub const DEFAULT_CAM_HALF_WIDTH: f64 = 30.0;

/// Default camera half height (orthographic size).
pub const DEFAULT_CAM_HALF_HEIGHT: f64 = 40.0;

// --- Spawning ---

/// Enemies spawned per second.
pub const DEFAULT_ENEMY_SPAWN_PER_SECOND: f64 = 0.5;

/// Padding used when an enemy declares no bounds radius.
pub const DEFAULT_ENEMY_INSET: f64 = 1.5;

/// Seconds between hero death and the scene reload.
pub const DEFAULT_GAME_RESTART_DELAY: f64 = 2.0;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Enemy defaults ---

pub const ENEMY_SPEED: f64 = 10.0;
pub const ENEMY_HEALTH: f64 = 10.0;
pub const ENEMY_SCORE: u32 = 100;
pub const ENEMY_POWER_UP_DROP_CHANCE: f64 = 1.0;

// --- Power-up defaults ---

/// Seconds a power-up lives before it starts fading.
pub const POWER_UP_LIFETIME_SECS: f64 = 6.0;

/// Seconds a power-up takes to fade out.
pub const POWER_UP_FADE_SECS: f64 = 4.0;

/// Downward drift speed of a power-up.
pub const POWER_UP_DRIFT_SPEED: f64 = 2.0;

// --- Weapon defaults ---

/// Projectile velocity for a default-constructed weapon definition.
pub const WEAPON_DEFAULT_VELOCITY: f64 = 20.0;
