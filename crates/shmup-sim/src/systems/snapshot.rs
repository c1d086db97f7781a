//! Snapshot system: queries the world and builds a `SessionSnapshot`.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use shmup_core::components::{Enemy, PowerUp};
use shmup_core::enums::SessionPhase;
use shmup_core::events::SessionEvent;
use shmup_core::state::{EnemyView, PowerUpView, SessionSnapshot};
use shmup_core::types::{Position, SimTime};

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SessionPhase,
    spawn_enemies: bool,
    events: Vec<SessionEvent>,
) -> SessionSnapshot {
    SessionSnapshot {
        time: *time,
        phase,
        spawn_enemies,
        enemies: build_enemies(world),
        power_ups: build_power_ups(world),
        events,
    }
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(entity, (enemy, pos))| EnemyView {
            entity_bits: entity.to_bits().get(),
            archetype: enemy.archetype.clone(),
            position: *pos,
        })
        .collect();
    enemies.sort_by_key(|e| e.entity_bits);
    enemies
}

fn build_power_ups(world: &World) -> Vec<PowerUpView> {
    let mut power_ups: Vec<PowerUpView> = world
        .query::<(&PowerUp, &Position)>()
        .iter()
        .map(|(entity, (power_up, pos))| PowerUpView {
            entity_bits: entity.to_bits().get(),
            weapon_type: power_up.weapon_type,
            letter: power_up.letter.clone(),
            position: *pos,
            opacity: opacity(power_up),
        })
        .collect();
    power_ups.sort_by_key(|p| p.entity_bits);
    power_ups
}

/// Fully opaque during the lifetime, then fading linearly to zero.
fn opacity(power_up: &PowerUp) -> f64 {
    let fading_for = power_up.age_secs - power_up.lifetime_secs;
    if fading_for <= 0.0 {
        1.0
    } else if power_up.fade_secs <= 0.0 {
        0.0
    } else {
        (1.0 - fading_for / power_up.fade_secs).clamp(0.0, 1.0)
    }
}
