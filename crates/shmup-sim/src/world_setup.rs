//! Entity spawn factories for the session world.
//!
//! Creates enemy and power-up entities from their archetypes with the
//! appropriate component bundles.

use hecs::World;

use shmup_core::components::{BoundsCheck, Enemy, PowerUp};
use shmup_core::config::{EnemyArchetype, PowerUpArchetype};
use shmup_core::enums::WeaponType;
use shmup_core::types::{Position, Velocity};

/// Spawn an enemy at the origin, moving down at its archetype speed.
/// A `BoundsCheck` is attached only when the archetype declares a radius.
pub fn spawn_enemy(world: &mut World, archetype: &EnemyArchetype) -> hecs::Entity {
    let enemy = Enemy {
        archetype: archetype.name.clone(),
        speed: archetype.speed,
        health: archetype.health,
        score: archetype.score,
        power_up_drop_chance: archetype.power_up_drop_chance,
    };
    let mut builder = hecs::EntityBuilder::new();
    builder
        .add(enemy)
        .add(Position::default())
        .add(Velocity::new(0.0, -archetype.speed));
    if let Some(radius) = archetype.radius {
        builder.add(BoundsCheck { radius });
    }
    world.spawn(builder.build())
}

/// Spawn a power-up of the given type at `position`.
pub fn spawn_power_up(
    world: &mut World,
    archetype: &PowerUpArchetype,
    weapon_type: WeaponType,
    letter: String,
    position: Position,
) -> hecs::Entity {
    world.spawn((
        PowerUp {
            weapon_type,
            letter,
            lifetime_secs: archetype.lifetime_secs,
            fade_secs: archetype.fade_secs,
            age_secs: 0.0,
        },
        position,
        Velocity::new(0.0, -archetype.drift_speed),
    ))
}

/// Declared bounds radius of an entity, if it has one.
pub fn declared_radius(world: &World, entity: hecs::Entity) -> Option<f64> {
    world
        .get::<&BoundsCheck>(entity)
        .ok()
        .map(|bounds| bounds.radius)
}
