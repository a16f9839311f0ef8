use crate::errors::ConfigError;
use crate::level::{DEFAULT_FIXED_LEVEL, DEFAULT_OPEN_FLOOR, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable numbers shared by every facility. Any field left out of the RON
/// file keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontierConfig {
    /// Battle Points for each regular win.
    pub points_per_win: u32,
    /// Battle Points for beating a Frontier Brain.
    pub brain_bonus: u32,
    /// The Hall Matron pays more than the other Brains.
    pub hall_brain_bonus: u32,
    pub fixed_level: u8,
    pub open_level_floor: u8,
    pub level_cap: u8,
    pub battles_per_set: u32,
    pub castle_starting_points: u32,
    pub arcade_starting_points: u32,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        FrontierConfig {
            points_per_win: 3,
            brain_bonus: 10,
            hall_brain_bonus: 20,
            fixed_level: DEFAULT_FIXED_LEVEL,
            open_level_floor: DEFAULT_OPEN_FLOOR,
            level_cap: MAX_LEVEL,
            battles_per_set: 7,
            castle_starting_points: 10,
            arcade_starting_points: 5,
        }
    }
}

impl FrontierConfig {
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read a RON config. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_ron(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(target: "frontier.config", path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }
}
