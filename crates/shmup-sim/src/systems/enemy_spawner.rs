//! Enemy spawning: one enemy per spawn-timer firing, just above the play area.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use shmup_core::config::EnemyArchetype;
use shmup_core::types::Position;

use crate::world_setup;

/// Spawn one enemy of a uniformly chosen archetype at a random x just above
/// the visible area. Returns `None` only if `archetypes` is empty.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    archetypes: &[EnemyArchetype],
    inset_default: f64,
    half_extents: DVec2,
) -> Option<(hecs::Entity, Position)> {
    if archetypes.is_empty() {
        return None;
    }
    let archetype = &archetypes[rng.gen_range(0..archetypes.len())];
    let entity = world_setup::spawn_enemy(world, archetype);

    let inset = enemy_inset(world, entity, inset_default);
    let position = spawn_position(half_extents, inset, rng);
    if let Ok(mut pos) = world.get::<&mut Position>(entity) {
        *pos = position;
    }

    debug!(archetype = %archetype.name, x = position.x, y = position.y, "enemy spawned");
    Some((entity, position))
}

/// Inset for an enemy: its declared radius, or the default when it has none.
pub fn enemy_inset(world: &World, entity: hecs::Entity, inset_default: f64) -> f64 {
    world_setup::declared_radius(world, entity)
        .map(f64::abs)
        .unwrap_or(inset_default)
}

/// Random spawn position: x uniform in `[-w + inset, w - inset]`,
/// y = `h + inset`.
///
/// When the inset is wider than the half width the range is empty and the
/// enemy is centered horizontally.
pub fn spawn_position(half_extents: DVec2, inset: f64, rng: &mut ChaCha8Rng) -> Position {
    let x_min = -half_extents.x + inset;
    let x_max = half_extents.x - inset;
    let x = if x_min <= x_max {
        rng.gen_range(x_min..=x_max)
    } else {
        warn!(inset, half_width = half_extents.x, "inset exceeds play area, spawning centered");
        0.0
    };
    Position::new(x, half_extents.y + inset)
}
