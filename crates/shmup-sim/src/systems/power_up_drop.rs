//! Power-up drops from destroyed enemies.

use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use shmup_core::config::PowerUpArchetype;
use shmup_core::enums::WeaponType;
use shmup_core::types::Position;
use shmup_core::weapons::WeaponRegistry;

use crate::world_setup;

/// Roll for a drop and, on success, spawn a power-up at `position`.
///
/// The draw is uniform in [0, 1) and succeeds when it is at most
/// `drop_chance`; a chance of zero never drops. The weapon type is picked
/// uniformly from `frequency`, so duplicated entries are weighted.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    registry: &WeaponRegistry,
    frequency: &[WeaponType],
    archetype: &PowerUpArchetype,
    drop_chance: f64,
    position: Position,
) -> Option<(hecs::Entity, WeaponType)> {
    let draw: f64 = rng.gen();
    if drop_chance <= 0.0 || draw > drop_chance {
        return None;
    }
    let weapon_type = *frequency.choose(rng)?;
    let letter = registry.lookup(weapon_type).letter;
    let entity = world_setup::spawn_power_up(world, archetype, weapon_type, letter, position);
    debug!(?weapon_type, x = position.x, y = position.y, "power-up dropped");
    Some((entity, weapon_type))
}
