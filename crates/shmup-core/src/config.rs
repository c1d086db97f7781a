//! Session configuration: the options an orchestrator instance is built from.
//!
//! Configuration is loaded from JSON (camelCase keys) and validated before a
//! session is constructed. Validation failures are fatal: a session is never
//! started from a configuration that would divide by zero or pick from an
//! empty list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::WeaponType;
use crate::weapons::WeaponDefinition;

/// Template for an enemy ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyArchetype {
    pub name: String,
    /// Declared bounds radius. `None` means the default inset is used.
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default = "default_enemy_speed")]
    pub speed: f64,
    #[serde(default = "default_enemy_health")]
    pub health: f64,
    #[serde(default = "default_enemy_score")]
    pub score: u32,
    #[serde(default = "default_drop_chance")]
    pub power_up_drop_chance: f64,
}

impl EnemyArchetype {
    /// An archetype with default stats.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            radius: None,
            speed: ENEMY_SPEED,
            health: ENEMY_HEALTH,
            score: ENEMY_SCORE,
            power_up_drop_chance: ENEMY_POWER_UP_DROP_CHANCE,
        }
    }
}

/// Template for the power-up dropped by destroyed enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PowerUpArchetype {
    pub name: String,
    pub lifetime_secs: f64,
    pub fade_secs: f64,
    pub drift_speed: f64,
}

impl Default for PowerUpArchetype {
    fn default() -> Self {
        Self {
            name: "PowerUp".to_string(),
            lifetime_secs: POWER_UP_LIFETIME_SECS,
            fade_secs: POWER_UP_FADE_SECS,
            drift_speed: POWER_UP_DRIFT_SPEED,
        }
    }
}

/// All options recognized by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Master switch for enemy spawning. Turning it off does not stop the timer.
    pub spawn_enemies: bool,
    pub enemy_spawn_per_second: f64,
    pub enemy_inset_default: f64,
    /// Seconds between hero death and the scene reload.
    pub game_restart_delay: f64,
    pub weapon_definitions: Vec<WeaponDefinition>,
    /// Duplicates weight the draw.
    pub power_up_frequency: Vec<WeaponType>,
    pub prefab_enemies: Vec<EnemyArchetype>,
    pub prefab_power_up: PowerUpArchetype,
    pub initial_scene: String,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spawn_enemies: true,
            enemy_spawn_per_second: DEFAULT_ENEMY_SPAWN_PER_SECOND,
            enemy_inset_default: DEFAULT_ENEMY_INSET,
            game_restart_delay: DEFAULT_GAME_RESTART_DELAY,
            weapon_definitions: Vec::new(),
            power_up_frequency: vec![
                WeaponType::Blaster,
                WeaponType::Blaster,
                WeaponType::Spread,
                WeaponType::Shield,
                WeaponType::MegaBullet,
            ],
            prefab_enemies: Vec::new(),
            prefab_power_up: PowerUpArchetype::default(),
            initial_scene: INITIAL_SCENE.to_string(),
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject configurations a session cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefab_enemies.is_empty() {
            return Err(ConfigError::NoEnemyArchetypes);
        }
        if !self.enemy_spawn_per_second.is_finite() || self.enemy_spawn_per_second <= 0.0 {
            return Err(ConfigError::InvalidSpawnRate(self.enemy_spawn_per_second));
        }
        check_non_negative("enemyInsetDefault", self.enemy_inset_default)?;
        check_non_negative("gameRestartDelay", self.game_restart_delay)?;
        self.spawn_interval()?;
        self.restart_delay()?;
        if self.power_up_frequency.is_empty() {
            return Err(ConfigError::EmptyPowerUpFrequency);
        }
        for archetype in &self.prefab_enemies {
            let chance = archetype.power_up_drop_chance;
            if !chance.is_finite() || !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::InvalidDropChance {
                    archetype: archetype.name.clone(),
                    chance,
                });
            }
        }
        Ok(())
    }

    /// Seconds between two spawn attempts.
    pub fn spawn_interval_secs(&self) -> f64 {
        1.0 / self.enemy_spawn_per_second
    }

    /// Simulated time between two spawn attempts.
    pub fn spawn_interval(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.spawn_interval_secs())
            .map_err(|_| ConfigError::InvalidSpawnRate(self.enemy_spawn_per_second))
    }

    /// Simulated time between hero death and the scene reload.
    pub fn restart_delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.game_restart_delay).map_err(|_| ConfigError::OutOfRange {
            option: "gameRestartDelay",
            value: self.game_restart_delay,
        })
    }
}

fn check_non_negative(option: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { option, value })
    }
}

fn default_enemy_speed() -> f64 {
    ENEMY_SPEED
}

fn default_enemy_health() -> f64 {
    ENEMY_HEALTH
}

fn default_enemy_score() -> u32 {
    ENEMY_SCORE
}

fn default_drop_chance() -> f64 {
    ENEMY_POWER_UP_DROP_CHANCE
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse session config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read session config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("prefabEnemies is empty; at least one enemy archetype is required")]
    NoEnemyArchetypes,
    #[error("enemySpawnPerSecond must be a positive number, got {0}")]
    InvalidSpawnRate(f64),
    #[error("{option} must be a non-negative number, got {value}")]
    Negative { option: &'static str, value: f64 },
    #[error("{option} is out of range: {value}")]
    OutOfRange { option: &'static str, value: f64 },
    #[error("powerUpFrequency is empty")]
    EmptyPowerUpFrequency,
    #[error("enemy archetype {archetype} has drop chance {chance}, expected a value in [0, 1]")]
    InvalidDropChance { archetype: String, chance: f64 },
}
