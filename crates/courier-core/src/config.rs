//! Configuration loading and typed config structures for the courier agent.
//!
//! The canonical configuration lives in `courier-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and provides a loader that reads and validates the file. Every
//! field has a default, so a missing file or a partial file is never fatal.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for a courier run.
///
/// Mirrors the structure of `courier-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CourierConfig {
    /// Grid and run settings.
    #[serde(default)]
    pub world: WorldSetupConfig,

    /// Scenario generation settings.
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Decision-engine tuning constants.
    #[serde(default)]
    pub strategy: StrategyConfig,
}

impl CourierConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Grid dimensions, tile layout, and run bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldSetupConfig {
    /// Grid width in columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Grid height in rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Random seed for reproducible scenario generation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per turn (0 runs the loop flat out).
    #[serde(default = "default_turn_interval_ms")]
    pub turn_interval_ms: u64,

    /// Maximum number of turns before the run stops.
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,

    /// Delivery tiles as `[x, y]` pairs.
    #[serde(default = "default_delivery_tiles")]
    pub delivery_tiles: Vec<[i32; 2]>,

    /// Blocked tiles as `[x, y]` pairs.
    #[serde(default)]
    pub blocked_tiles: Vec<[i32; 2]>,
}

impl Default for WorldSetupConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            turn_interval_ms: default_turn_interval_ms(),
            max_turns: default_max_turns(),
            delivery_tiles: default_delivery_tiles(),
            blocked_tiles: Vec::new(),
        }
    }
}

/// Scenario generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Number of parcels scattered on the grid.
    #[serde(default = "default_parcel_count")]
    pub parcel_count: u32,

    /// Minimum parcel reward (inclusive).
    #[serde(default = "default_min_reward")]
    pub min_reward: u32,

    /// Maximum parcel reward (inclusive).
    #[serde(default = "default_max_reward")]
    pub max_reward: u32,

    /// Number of scripted wanderer agents sharing the grid.
    #[serde(default = "default_wanderer_count")]
    pub wanderer_count: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            parcel_count: default_parcel_count(),
            min_reward: default_min_reward(),
            max_reward: default_max_reward(),
            wanderer_count: default_wanderer_count(),
        }
    }
}

/// Tuning constants for the delivery decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StrategyConfig {
    /// Minimum reward a parcel must exceed to be considered as a detour.
    #[serde(default = "default_delivery_threshold")]
    pub delivery_threshold: u32,

    /// Cap on extra travel for a detour. The same value bounds both the
    /// cheap distance pre-filter and the added-route-steps check.
    #[serde(default = "default_max_detour_distance")]
    pub max_detour_distance: u32,

    /// Consecutive blocked turns tolerated before the route is abandoned.
    #[serde(default = "default_blocked_timeout")]
    pub blocked_timeout: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            delivery_threshold: default_delivery_threshold(),
            max_detour_distance: default_max_detour_distance(),
            blocked_timeout: default_blocked_timeout(),
        }
    }
}

fn default_width() -> u32 {
    10
}

fn default_height() -> u32 {
    10
}

fn default_seed() -> u64 {
    42
}

fn default_turn_interval_ms() -> u64 {
    250
}

fn default_max_turns() -> u64 {
    200
}

fn default_delivery_tiles() -> Vec<[i32; 2]> {
    vec![[9, 0], [9, 9]]
}

fn default_parcel_count() -> u32 {
    6
}

fn default_min_reward() -> u32 {
    5
}

fn default_max_reward() -> u32 {
    50
}

fn default_wanderer_count() -> u32 {
    2
}

fn default_delivery_threshold() -> u32 {
    5
}

fn default_max_detour_distance() -> u32 {
    5
}

fn default_blocked_timeout() -> u32 {
    3
}
