//! Board configuration
//!
//! Loaded from JSON or YAML (chosen by file extension). Every field has a
//! default, so an empty document is a valid config. Hosts can point
//! `FORMATION_BOARD_CONFIG` at a file instead of passing one explicitly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use std::{env, fs};
use thiserror::Error;

use crate::presets;

pub const CONFIG_PATH_ENV: &str = "FORMATION_BOARD_CONFIG";

/// Hard ceiling for the bench; the UI has no layout for more cells
pub const MAX_BENCH_CAPACITY: usize = 12;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Preset used for placeholder lineups and unknown saved presets
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Number of bench cells (default: 7)
    #[serde(default = "default_bench_capacity")]
    pub bench_capacity: usize,

    /// Quiet period after the last change before a save is sent (default: 800ms)
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    /// Chip radius as a fraction of pitch width (default: 0.035)
    #[serde(default = "default_chip_radius_ratio")]
    pub chip_radius_ratio: f32,

    /// Bench strip height as a fraction of pitch width (default: 0.12)
    #[serde(default = "default_bench_height_ratio")]
    pub bench_height_ratio: f32,

    /// Pixels between the pitch and the bench strip
    #[serde(default = "default_bench_gap_px")]
    pub bench_gap_px: f32,
}

fn default_preset() -> String {
    presets::DEFAULT_PRESET.to_string()
}
fn default_bench_capacity() -> usize {
    7
}
fn default_save_debounce_ms() -> u64 {
    800
}
fn default_chip_radius_ratio() -> f32 {
    0.035
}
fn default_bench_height_ratio() -> f32 {
    0.12
}
fn default_bench_gap_px() -> f32 {
    12.0
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            bench_capacity: default_bench_capacity(),
            save_debounce_ms: default_save_debounce_ms(),
            chip_radius_ratio: default_chip_radius_ratio(),
            bench_height_ratio: default_bench_height_ratio(),
            bench_gap_px: default_bench_gap_px(),
        }
    }
}

impl BoardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Config named by `FORMATION_BOARD_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }
        Self::from_path(Path::new(path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !presets::is_known(&self.default_preset) {
            return Err(ConfigError::Validation(format!(
                "default_preset '{}' is not a known preset",
                self.default_preset
            )));
        }
        if self.bench_capacity == 0 || self.bench_capacity > MAX_BENCH_CAPACITY {
            return Err(ConfigError::Validation(format!(
                "bench_capacity must be 1-{}, got {}",
                MAX_BENCH_CAPACITY, self.bench_capacity
            )));
        }
        if !(0.005..=0.2).contains(&self.chip_radius_ratio) {
            return Err(ConfigError::Validation(format!(
                "chip_radius_ratio must be 0.005-0.2, got {}",
                self.chip_radius_ratio
            )));
        }
        if !(0.02..=0.5).contains(&self.bench_height_ratio) {
            return Err(ConfigError::Validation(format!(
                "bench_height_ratio must be 0.02-0.5, got {}",
                self.bench_height_ratio
            )));
        }
        if self.bench_gap_px < 0.0 {
            return Err(ConfigError::Validation(format!(
                "bench_gap_px must not be negative, got {}",
                self.bench_gap_px
            )));
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
