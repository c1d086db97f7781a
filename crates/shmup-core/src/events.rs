//! Events emitted by a session while it steps.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponType;
use crate::types::Position;

/// Something observable that happened during a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// An enemy entered above the play area.
    EnemySpawned {
        entity_bits: u64,
        archetype: String,
        position: Position,
    },
    /// An enemy was destroyed by the host.
    EnemyDestroyed { entity_bits: u64, position: Position },
    /// An enemy left the bottom of the play area without being destroyed.
    EnemyEscaped { entity_bits: u64 },
    /// A power-up was left where an enemy died.
    PowerUpSpawned {
        entity_bits: u64,
        weapon_type: WeaponType,
        position: Position,
    },
    /// A power-up faded out uncollected.
    PowerUpExpired { entity_bits: u64 },
    /// The hero died; a reload will follow after `delay_secs`.
    RestartScheduled { delay_secs: f64 },
    /// The restart delay elapsed; the host must reload `scene`.
    SceneReloadRequested { scene: String },
}
