//! Cleanup system: removes enemies that left the play area and expired power-ups.

use glam::DVec2;
use hecs::{Entity, World};

use shmup_core::components::{BoundsCheck, Enemy, PowerUp};
use shmup_core::events::SessionEvent;
use shmup_core::types::Position;

/// Despawn enemies fully below the play area and power-ups that have faded
/// out or drifted off the bottom. Uses a pre-allocated buffer to avoid
/// per-step allocation.
pub fn run(
    world: &mut World,
    half_extents: DVec2,
    inset_default: f64,
    despawn_buffer: &mut Vec<Entity>,
    events: &mut Vec<SessionEvent>,
) {
    despawn_buffer.clear();

    for (entity, (pos, _enemy, bounds)) in
        world.query_mut::<(&Position, &Enemy, Option<&BoundsCheck>)>()
    {
        let inset = bounds.map_or(inset_default, |b| b.radius.abs());
        if pos.y < -half_extents.y - inset {
            despawn_buffer.push(entity);
            events.push(SessionEvent::EnemyEscaped {
                entity_bits: entity.to_bits().get(),
            });
        }
    }

    for (entity, (pos, power_up)) in world.query_mut::<(&Position, &PowerUp)>() {
        let faded = power_up.age_secs >= power_up.lifetime_secs + power_up.fade_secs;
        let off_screen = pos.y < -half_extents.y - inset_default;
        if faded || off_screen {
            despawn_buffer.push(entity);
            events.push(SessionEvent::PowerUpExpired {
                entity_bits: entity.to_bits().get(),
            });
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
