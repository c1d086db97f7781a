//! Systems that operate on the session world.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for read-only).
//! They do not own state — all state lives in components or in the session.

pub mod cleanup;
pub mod enemy_spawner;
pub mod movement;
pub mod power_up_drop;
pub mod snapshot;
