//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Session logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponType;

/// An enemy ship spawned by the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Name of the archetype it was spawned from.
    pub archetype: String,
    /// Downward speed (units/s).
    pub speed: f64,
    pub health: f64,
    pub score: u32,
    /// Probability in [0, 1] of leaving a power-up when destroyed.
    pub power_up_drop_chance: f64,
}

/// Declared bounds radius of an entity. Absent when the archetype
/// declares none; spawning then falls back to the default inset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundsCheck {
    pub radius: f64,
}

/// A collectible power-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub weapon_type: WeaponType,
    /// Letter shown on the power-up cube.
    pub letter: String,
    pub lifetime_secs: f64,
    pub fade_secs: f64,
    /// Seconds since spawn.
    pub age_secs: f64,
}
