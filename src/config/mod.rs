//! Game configuration.
//!
//! Defaults are compiled in. On native builds `assets/config.ron` may override
//! any subset of fields; a missing file is silent, a malformed one is logged
//! and ignored. The browser build always uses the defaults.

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Vertical page-chrome offset (header height) added when drawing.
    pub page_offset: f32,
    /// How long approach hints stay up.
    pub hint_secs: f32,
    /// How long interaction results stay up.
    pub message_secs: f32,
    /// Inventory slots available to the player.
    pub inventory_capacity: usize,
    /// Fixed seed for quiz shuffling; `None` draws from entropy.
    pub rng_seed: Option<u64>,
    /// Directory for saved progress on native builds.
    pub save_dir: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            page_offset: 0.0,
            hint_secs: 3.0,
            message_secs: 2.0,
            inventory_capacity: 4,
            rng_seed: None,
            save_dir: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl GameConfig {
    pub const PATH: &'static str = "assets/config.ron";

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Config at `path`; defaults when the file does not exist.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read `PATH`, logging and falling back to defaults on error. Call after
    /// `LogPlugin` is installed or the report is lost.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match Self::read(Self::PATH) {
            Ok(config) => {
                info!("Config ready ({})", Self::PATH);
                config
            }
            Err(e) => {
                warn!("{} ({}); using defaults", e, Self::PATH);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::default()
    }
}
