//! Replay configuration types.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::validate::{ValidationError, ValidationResult};

/// Environment variable consulted for the speed multiplier when the flag is
/// absent.
pub const SPEED_ENV_VAR: &str = "MODRAW_SIM_SPEED";

/// How much of a packet's time is reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMode {
    /// Relative offset plus absolute date from the header's `OFFSET_TIME`.
    /// Every header must carry the year offset.
    #[default]
    Absolute,
    /// Relative offset only; `OFFSET_TIME` is optional and ignored.
    RelativeOnly,
}

impl std::fmt::Display for DateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateMode::Absolute => write!(f, "absolute"),
            DateMode::RelativeOnly => write!(f, "relative_only"),
        }
    }
}

/// Settings shared by every file of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Time multiplier; 2.0 replays twice as fast as recorded.
    pub speed: f64,

    pub date_mode: DateMode,

    /// Per-packet progress and timestamp logging. Never affects timing.
    pub verbose: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            date_mode: DateMode::Absolute,
            verbose: false,
        }
    }
}

/// Values taken from the command line (or its environment fallbacks).
/// `None`/`false` means "not given, keep the lower layer".
#[derive(Debug, Clone, Default)]
pub struct ReplayOverrides {
    pub speed: Option<f64>,
    pub relative_only: bool,
    pub verbose: bool,
}

impl ReplayConfig {
    /// Reject settings the scheduler can't work with.
    pub fn validate(&self) -> ValidationResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ValidationError::InvalidSpeed(self.speed));
        }
        Ok(())
    }

    /// Load a config file (JSON). Missing keys take their defaults.
    pub fn load(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ValidationError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        serde_json::from_str(&content).map_err(|source| ValidationError::InvalidConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the effective configuration: overrides → config file → defaults.
    pub fn resolve(file: Option<&Path>, overrides: &ReplayOverrides) -> ValidationResult<Self> {
        let mut config = match file {
            Some(path) => {
                debug!(path = %path.display(), "loading replay config file");
                Self::load(path)?
            }
            None => Self::default(),
        };

        if let Some(speed) = overrides.speed {
            config.speed = speed;
        }
        if overrides.relative_only {
            config.date_mode = DateMode::RelativeOnly;
        }
        if overrides.verbose {
            config.verbose = true;
        }

        config.validate()?;
        Ok(config)
    }
}
