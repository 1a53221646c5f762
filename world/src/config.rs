//! World configuration consumed once at initialization.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on configured lanes, set by the width of [`lanewar_core::LaneId`].
pub const MAX_LANES: usize = u8::MAX as usize + 1;

/// Errors raised while loading a [`WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read world config {path}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse world config")]
    Parse(#[from] toml::de::Error),
    /// Arena extents must be finite and positive.
    #[error("arena bounds must be finite and positive, got {width}x{height}")]
    InvalidBounds {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// More lanes were configured than lane identifiers can address.
    #[error("at most 256 lanes are supported, got {count}")]
    TooManyLanes {
        /// Number of configured lanes.
        count: usize,
    },
}

/// Arena extent in world units; the arena is centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Extent along the x axis.
    pub width: f32,
    /// Extent along the y axis.
    pub height: f32,
}

/// Relative lane topology for a single lane key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaneDefinition {
    /// Name of the lane, such as `"mid"`.
    pub key: String,
    /// Ordered waypoints in `[0, 1]²`, from the explorer end to the horde end.
    #[serde(default)]
    pub waypoints: Vec<[f32; 2]>,
    /// Index of the waypoint that forms the lane's chokepoint.
    #[serde(default)]
    pub chokepoint: usize,
}

/// Everything the world needs to build itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Arena extent used to scale waypoints and clamp positions.
    pub arena: ArenaConfig,
    /// Seed for spawn-position jitter.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Lane the enemy hero pushes along.
    #[serde(default = "default_hero_lane")]
    pub hero_lane: String,
    /// Lane topology in lane-id order.
    #[serde(default)]
    pub lanes: Vec<LaneDefinition>,
}

impl WorldConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks the invariants the world relies on.
    ///
    /// Lanes with too few waypoints are accepted; the world treats them as
    /// inert.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ArenaConfig { width, height } = self.arena;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidBounds { width, height });
        }
        if self.lanes.len() > MAX_LANES {
            return Err(ConfigError::TooManyLanes {
                count: self.lanes.len(),
            });
        }
        Ok(())
    }

    /// Returns a copy using the provided jitter seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig {
                width: 120.0,
                height: 120.0,
            },
            seed: default_seed(),
            hero_lane: default_hero_lane(),
            lanes: vec![
                LaneDefinition {
                    key: "top".to_owned(),
                    waypoints: vec![
                        [0.08, 0.08],
                        [0.08, 0.5],
                        [0.1, 0.9],
                        [0.5, 0.92],
                        [0.92, 0.92],
                    ],
                    chokepoint: 2,
                },
                LaneDefinition {
                    key: "mid".to_owned(),
                    waypoints: vec![
                        [0.08, 0.08],
                        [0.3, 0.3],
                        [0.5, 0.5],
                        [0.7, 0.7],
                        [0.92, 0.92],
                    ],
                    chokepoint: 2,
                },
                LaneDefinition {
                    key: "bot".to_owned(),
                    waypoints: vec![
                        [0.08, 0.08],
                        [0.5, 0.08],
                        [0.9, 0.1],
                        [0.92, 0.5],
                        [0.92, 0.92],
                    ],
                    chokepoint: 2,
                },
            ],
        }
    }
}

const fn default_seed() -> u64 {
    0x6c61_6e65_7761_7221
}

fn default_hero_lane() -> String {
    "mid".to_owned()
}
