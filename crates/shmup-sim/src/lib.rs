//! Session engine for the SHMUP orchestrator.
//!
//! Owns the hecs world of spawned entities, drives the spawn and restart
//! timers in simulated time, and produces `SessionSnapshot`s for the host.

pub mod game;
pub mod host;
pub mod session;
pub mod systems;
pub mod timer;
pub mod world_setup;

pub use game::Game;
pub use session::{Session, SessionError};
pub use shmup_core as core;

#[cfg(test)]
mod tests;
