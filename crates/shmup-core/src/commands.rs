//! Commands sent from the host to a session.
//!
//! Commands are queued and processed at the start of the next step.

use serde::{Deserialize, Serialize};

/// All actions a host can request from a running session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// Flip the master spawn switch. The spawn timer keeps running either way.
    SetSpawnEnemies { enabled: bool },
    /// An enemy was destroyed (by the hero's weapons or a collision).
    /// `entity_bits` is the hecs entity in its `to_bits` form.
    DestroyEnemy { entity_bits: u64 },
    /// The hero died; schedule the restart.
    HeroDied,
}
