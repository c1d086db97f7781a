//! SHMUP headless runner.
//!
//! Wires the session engine into a fixed-rate game loop thread driven over
//! a command channel, with tracing-based logging.

pub mod game_loop;
pub mod logging;
pub mod state;

pub use shmup_core as core;

/// Session configuration shipped with the runner.
pub const DEFAULT_CONFIG: &str = include_str!("../config/session.json");
