//! Session snapshot — the visible state after each step.

use serde::{Deserialize, Serialize};

use crate::enums::{SessionPhase, WeaponType};
use crate::events::SessionEvent;
use crate::types::{Position, SimTime};

/// Complete observable session state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub spawn_enemies: bool,
    pub enemies: Vec<EnemyView>,
    pub power_ups: Vec<PowerUpView>,
    /// Events produced during the step that built this snapshot.
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnemyView {
    pub entity_bits: u64,
    pub archetype: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpView {
    pub entity_bits: u64,
    pub weapon_type: WeaponType,
    pub letter: String,
    pub position: Position,
    /// 1.0 while fresh, falling to 0.0 over the fade window.
    pub opacity: f64,
}
