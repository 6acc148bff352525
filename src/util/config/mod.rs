//! Scheduler configuration
//!
//! Loaded from TOML. Every field is optional and falls back to its default,
//! so an empty file yields [`SchedulerConfig::default`].
//!
//! ```toml
//! name = "scene"
//! initial_capacity = 64
//! time_scale = 0.5
//! max_dt = 0.1
//! log_level = "debug"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use tickflow::util::config::SchedulerConfig;
//!
//! let config = SchedulerConfig::from_toml_str("time_scale = 2.0").unwrap();
//! assert_eq!(config.effective_dt(0.5), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::logger::LogLevel;

/// Configuration for a [`CoroutineManager`](crate::runtime::scheduler::CoroutineManager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Label attached to the manager's log records.
    pub name: String,
    /// Registry slots reserved up front.
    pub initial_capacity: usize,
    /// Multiplier applied to every `dt` before it reaches the coroutines.
    pub time_scale: f64,
    /// Upper bound on the scaled `dt` of a single tick.
    pub max_dt: Option<f64>,
    /// Level used when the embedding binary sets up logging.
    pub log_level: LogLevel,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: "coroutines".to_string(),
            initial_capacity: 16,
            time_scale: 1.0,
            max_dt: None,
            log_level: LogLevel::Info,
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings that would corrupt tick arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::Invalid {
                field: "time_scale",
                reason: format!("must be finite and non-negative, got {}", self.time_scale),
            });
        }
        if let Some(max_dt) = self.max_dt {
            if max_dt.is_nan() || max_dt <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "max_dt",
                    reason: format!("must be positive, got {}", max_dt),
                });
            }
        }
        Ok(())
    }

    /// The `dt` coroutines observe for a host tick of `dt` seconds.
    #[inline]
    pub fn effective_dt(
        &self,
        dt: f64,
    ) -> f64 {
        let scaled = dt * self.time_scale;
        match self.max_dt {
            Some(max_dt) => scaled.min(max_dt),
            None => scaled,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
