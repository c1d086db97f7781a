//! Enumeration types used throughout the session.

use serde::{Deserialize, Serialize};

/// Weapon type carried by weapon definitions and power-ups.
///
/// `None` is the "no weapon" value and doubles as the registry's
/// not-found sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeaponType {
    /// No weapon.
    #[default]
    None,
    /// Simple forward blaster.
    Blaster,
    /// Two shots at once.
    Spread,
    /// Shots that move in waves.
    Phaser,
    /// Homing missiles.
    Missile,
    /// Damage over time.
    Laser,
    /// Raises shield level.
    Shield,
    /// Oversized slow projectile.
    MegaBullet,
}

/// Session lifecycle phase.
///
/// `Uninitialized -> Running -> RestartPending`, then the scene reload
/// replaces the whole session with a fresh `Uninitialized` one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Running,
    RestartPending,
}
