//! Simulation configuration
//!
//! A [`SimulationConfig`] is everything one run needs: capacity, the demand
//! sources, the queue timeout and the horizon. Configs are plain serde
//! structs so callers can load them from JSON or build them in code.
//!
//! Validation happens once, at the boundary. A config that passes
//! [`SimulationConfig::validate`] always runs to completion.

use crate::arrivals::DemandSource;
use crate::core::time::MINUTES_PER_DAY;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Default minutes an item may wait before it is shed
pub const DEFAULT_QUEUE_TIMEOUT: usize = 30;

/// Default spacing (in minutes) between points of the sampled output trace
pub const DEFAULT_SAMPLE_INTERVAL: usize = 5;

/// Reasons a configuration is rejected before running
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capacity must be finite and non-negative, got {0}")]
    InvalidCapacity(f64),

    #[error("source id must not be empty")]
    EmptySourceId,

    #[error("duplicate source id: {0}")]
    DuplicateSourceId(String),

    #[error("source {source_id}: total volume must be finite and non-negative, got {volume}")]
    InvalidVolume { source_id: String, volume: f64 },

    #[error("source {source_id}: priority must be a positive integer")]
    InvalidPriority { source_id: String },

    #[error("source {source_id}: gaussian spread must be positive, got {spread_hours}")]
    InvalidSpread {
        source_id: String,
        spread_hours: f64,
    },

    #[error("source {source_id}: peak hour must lie in [0, 24), got {peak_hour}")]
    InvalidPeakHour { source_id: String, peak_hour: f64 },

    #[error("horizon must be at least one minute")]
    ZeroHorizon,

    #[error("sample interval must be at least one minute")]
    ZeroSampleInterval,

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Complete configuration for one simulation run
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::{DemandSource, SimulationConfig};
///
/// let config = SimulationConfig::new(100.0, 30)
///     .with_source(DemandSource::gaussian("web", 100_000.0, 1, 15.0, 3.0))
///     .with_source(DemandSource::linear("batch", 20_000.0, 2));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.horizon_minutes, 1440);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Demand volume that can be served per minute
    pub capacity: f64,

    /// Demand sources, in caller order (order is kept in the output)
    #[serde(default)]
    pub sources: Vec<DemandSource>,

    /// Minutes an item may wait before it is shed (0 = same-minute service only)
    #[serde(default = "default_queue_timeout")]
    pub queue_timeout: usize,

    /// Horizon length in minutes
    #[serde(default = "default_horizon_minutes")]
    pub horizon_minutes: usize,

    /// Spacing between points of the sampled output trace
    #[serde(default = "default_sample_interval")]
    pub sample_interval: usize,
}

fn default_queue_timeout() -> usize {
    DEFAULT_QUEUE_TIMEOUT
}

fn default_horizon_minutes() -> usize {
    MINUTES_PER_DAY
}

fn default_sample_interval() -> usize {
    DEFAULT_SAMPLE_INTERVAL
}

impl SimulationConfig {
    /// Config over a one-day horizon with no sources yet
    pub fn new(capacity: f64, queue_timeout: usize) -> Self {
        Self {
            capacity,
            sources: Vec::new(),
            queue_timeout,
            horizon_minutes: MINUTES_PER_DAY,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    pub fn with_source(mut self, source: DemandSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_horizon(mut self, horizon_minutes: usize) -> Self {
        self.horizon_minutes = horizon_minutes;
        self
    }

    pub fn with_sample_interval(mut self, sample_interval: usize) -> Self {
        self.sample_interval = sample_interval;
        self
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sum of all configured source volumes
    pub fn total_volume(&self) -> f64 {
        self.sources.iter().map(|s| s.total_volume).sum()
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err(ConfigError::InvalidCapacity(self.capacity));
        }

        if self.horizon_minutes == 0 {
            return Err(ConfigError::ZeroHorizon);
        }

        if self.sample_interval == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }

        let mut ids = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !ids.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateSourceId(source.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_when_fields_missing() {
        let config: SimulationConfig = serde_json::from_str(r#"{"capacity": 10}"#).unwrap();
        assert_eq!(config.queue_timeout, DEFAULT_QUEUE_TIMEOUT);
        assert_eq!(config.horizon_minutes, MINUTES_PER_DAY);
        assert_eq!(config.sample_interval, DEFAULT_SAMPLE_INTERVAL);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_zero_sample_interval_rejected() {
        let config = SimulationConfig::new(10.0, 5).with_sample_interval(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSampleInterval)
        ));
    }

    #[test]
    fn test_total_volume() {
        let config = SimulationConfig::new(10.0, 5)
            .with_source(DemandSource::linear("a", 100.0, 1))
            .with_source(DemandSource::linear("b", 50.0, 2));
        assert_eq!(config.total_volume(), 150.0);
    }
}
