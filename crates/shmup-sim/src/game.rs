//! Game host: owns the scene loader and the live session.
//!
//! When a session asks for its scene to be reloaded, the host tears the old
//! session down and loads a fresh one. That reload is the only reset path:
//! the new session rebuilds its registry and timers from configuration.

use std::time::Duration;

use tracing::info;

use shmup_core::commands::SessionCommand;
use shmup_core::events::SessionEvent;
use shmup_core::state::SessionSnapshot;

use crate::host::{SceneError, SceneLoader};
use crate::session::Session;

pub struct Game<L: SceneLoader> {
    loader: L,
    session: Session,
    reloads: u32,
}

impl<L: SceneLoader> Game<L> {
    /// Load `initial_scene` and start its session.
    pub fn new(mut loader: L, initial_scene: &str) -> Result<Self, SceneError> {
        let mut session = loader.load_scene(initial_scene)?;
        session.start();
        Ok(Self {
            loader,
            session,
            reloads: 0,
        })
    }

    /// Queue a command for the live session.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.session.queue_command(command);
    }

    /// Advance the live session. If it requests a scene reload during the
    /// step, the reload happens at that point and the rest of `dt` runs on
    /// the fresh session. The snapshot describes the live session after the
    /// step; its events start with those of any outgoing session.
    pub fn advance(&mut self, dt: Duration) -> Result<SessionSnapshot, SceneError> {
        let mut events = Vec::new();
        let mut remaining = dt;
        loop {
            let (mut snapshot, rest) = self.session.advance_until_reload(remaining);
            let reload = snapshot.events.iter().find_map(|event| match event {
                SessionEvent::SceneReloadRequested { scene } => Some(scene.clone()),
                _ => None,
            });
            events.append(&mut snapshot.events);
            let Some(scene) = reload else {
                snapshot.events = events;
                return Ok(snapshot);
            };
            self.reload(&scene)?;
            remaining = rest;
        }
    }

    /// Replace the live session with a freshly loaded one.
    pub fn reload(&mut self, scene: &str) -> Result<(), SceneError> {
        let mut next = self.loader.load_scene(scene)?;
        next.start();
        self.session.teardown();
        self.session = next;
        self.reloads += 1;
        info!(scene, reloads = self.reloads, "scene reloaded");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Number of scene reloads so far.
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
