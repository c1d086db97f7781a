//! Kinematic integration system.
//!
//! Updates Position from Velocity each step: position += velocity * dt.
//! Also ages power-ups.

use std::time::Duration;

use glam::DVec2;
use hecs::World;

use shmup_core::components::PowerUp;
use shmup_core::types::{Position, Velocity};

/// Run kinematic integration for all entities with Position + Velocity.
pub fn run(world: &mut World, dt: Duration) {
    let dt = dt.as_secs_f64();
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        *pos = (DVec2::from(*pos) + DVec2::from(*vel) * dt).into();
    }
    for (_entity, power_up) in world.query_mut::<&mut PowerUp>() {
        power_up.age_secs += dt;
    }
}
