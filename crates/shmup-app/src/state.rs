//! State shared between the runner's main thread and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use shmup_core::commands::SessionCommand;
use shmup_core::state::SessionSnapshot;

/// Commands sent from the main thread to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A command to forward to the live session.
    Session(SessionCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after each tick.
pub type SharedSnapshot = Arc<Mutex<Option<SessionSnapshot>>>;

/// Totals accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub enemies_spawned: u32,
    pub enemies_destroyed: u32,
    pub enemies_escaped: u32,
    pub power_ups_spawned: u32,
    pub power_ups_expired: u32,
    pub scene_reloads: u32,
}
