//! Session configuration: stat bounds, starting values, and the
//! compatibility counter's range, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::stats::{PlayerStats, Stat, StatRange};

/// Errors raised while loading session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A range with `min > max` can never clamp sensibly.
    #[error("invalid range for {name}: min {min} > max {max}")]
    InvalidRange {
        name: &'static str,
        min: i32,
        max: i32,
    },
}

/// Starting value and bounds for one clamped counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub start: i32,
    pub range: StatRange,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            start: 50,
            range: StatRange::new(0, 100),
        }
    }
}

/// Per-stat configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub reputation: CounterConfig,
    pub money: CounterConfig,
    pub health: CounterConfig,
}

impl StatsConfig {
    /// Bounds for a given stat.
    pub fn range(&self, stat: Stat) -> &StatRange {
        match stat {
            Stat::Reputation => &self.reputation.range,
            Stat::Money => &self.money.range,
            Stat::Health => &self.health.range,
        }
    }

    /// Player stats at their configured starting values.
    pub fn starting_stats(&self) -> PlayerStats {
        PlayerStats::new(self.reputation.start, self.money.start, self.health.start)
    }
}

/// Starting value and bounds for the family-compatibility counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    pub start: i32,
    pub range: StatRange,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            start: 0,
            range: StatRange::new(-10, 10),
        }
    }
}

/// Configuration for one narrative session. Every field has a default, so an
/// empty document is a valid configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub stats: StatsConfig,
    pub compatibility: CompatibilityConfig,
}

impl SessionConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("reputation", &self.stats.reputation.range),
            ("money", &self.stats.money.range),
            ("health", &self.stats.health.range),
            ("compatibility", &self.compatibility.range),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(ConfigError::InvalidRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}
