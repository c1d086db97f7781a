//! Collaborators supplied by the host: play-area bounds and scene loading.

use std::collections::HashMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use shmup_core::config::{ConfigError, SessionConfig};
use shmup_core::constants::{DEFAULT_CAM_HALF_HEIGHT, DEFAULT_CAM_HALF_WIDTH};

use crate::session::Session;

/// Source of the visible play-area extent.
pub trait BoundsProvider {
    /// Half width (x) and half height (y) of the visible area.
    fn half_extents(&self) -> DVec2;
}

/// A fixed orthographic camera view centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayArea {
    pub cam_width: f64,
    pub cam_height: f64,
}

impl PlayArea {
    pub fn new(cam_width: f64, cam_height: f64) -> Self {
        Self {
            cam_width,
            cam_height,
        }
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(DEFAULT_CAM_HALF_WIDTH, DEFAULT_CAM_HALF_HEIGHT)
    }
}

impl BoundsProvider for PlayArea {
    fn half_extents(&self) -> DVec2 {
        DVec2::new(self.cam_width, self.cam_height)
    }
}

/// Builds a fresh session for a named scene.
///
/// Loading a scene is the only way session state is reset: the previous
/// session is dropped and everything is rebuilt from configuration.
pub trait SceneLoader {
    fn load_scene(&mut self, name: &str) -> Result<Session, SceneError>;
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no scene named {0:?}")]
    UnknownScene(String),
    #[error("scene configuration rejected: {0}")]
    Config(#[from] ConfigError),
}

/// Scene loader backed by in-memory configurations.
///
/// Every load derives a new RNG seed from the configured one so that
/// consecutive sessions do not replay the same spawn pattern.
pub struct ConfigSceneLoader {
    scenes: HashMap<String, SessionConfig>,
    play_area: PlayArea,
    loads: u64,
}

impl ConfigSceneLoader {
    pub fn new(play_area: PlayArea) -> Self {
        Self {
            scenes: HashMap::new(),
            play_area,
            loads: 0,
        }
    }

    /// Loader with a single scene, registered under its `initial_scene` name.
    pub fn single(config: SessionConfig, play_area: PlayArea) -> Self {
        let mut loader = Self::new(play_area);
        loader.insert(config.initial_scene.clone(), config);
        loader
    }

    pub fn insert(&mut self, name: impl Into<String>, config: SessionConfig) {
        self.scenes.insert(name.into(), config);
    }

    /// Number of sessions built so far.
    pub fn loads(&self) -> u64 {
        self.loads
    }
}

impl SceneLoader for ConfigSceneLoader {
    fn load_scene(&mut self, name: &str) -> Result<Session, SceneError> {
        let mut config = self
            .scenes
            .get(name)
            .cloned()
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        config.seed = config.seed.wrapping_add(self.loads);
        let session = Session::new(config, self.play_area)?;
        self.loads += 1;
        info!(scene = name, load = self.loads, "scene loaded");
        Ok(session)
    }
}
