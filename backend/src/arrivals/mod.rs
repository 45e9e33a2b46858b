//! Demand generation: turns a demand-source description into a per-minute curve.
//!
//! Each source describes how its daily volume is spread over the horizon.
//! Curves are analytic, so generation is fully deterministic: the same source
//! always produces the same trace.
//!
//! # Shapes
//!
//! - **Linear**: the volume is spread uniformly, every minute carries
//!   `total_volume / horizon`.
//! - **Gaussian**: a bell curve centred at `peak_hour * 60` with a standard
//!   deviation of `spread_hours * 60` minutes. The kernel is scaled by the
//!   closed-form integral of the continuous Gaussian (not renormalised over
//!   the discrete minutes), so the trace sum tracks the configured volume to
//!   within the discretisation and truncation error of the horizon edges.
//!
//! # Example
//!
//! ```
//! use capacity_simulator_core_rs::arrivals::{generate_trace, DemandSource};
//!
//! let source = DemandSource::linear("batch", 1440.0, 2);
//! let trace = generate_trace(&source, 1440).unwrap();
//! assert_eq!(trace.len(), 1440);
//! assert_eq!(trace.at(0), 1.0);
//! assert_eq!(trace.total(), 1440.0);
//! ```

use crate::config::ConfigError;
use crate::core::time::MINUTES_PER_HOUR;
use serde::{Deserialize, Serialize};

/// Shape of a demand curve and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DemandShape {
    /// Bell curve peaking at `peak_hour` (time of day, `[0, 24)`)
    Gaussian {
        /// Hour of day at which demand peaks
        peak_hour: f64,
        /// Standard deviation of the curve in hours (must be > 0)
        spread_hours: f64,
    },

    /// Constant demand across the horizon
    Linear,
}

/// Immutable description of one stream of demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSource {
    /// Unique identifier, stable across the run
    pub id: String,

    /// Total demand volume over the horizon
    pub total_volume: f64,

    /// Priority (1 = served first; larger values are served later)
    pub priority: u32,

    /// Curve shape and its parameters
    pub shape: DemandShape,
}

impl DemandSource {
    /// Gaussian source peaking at `peak_hour` with the given spread.
    pub fn gaussian(
        id: impl Into<String>,
        total_volume: f64,
        priority: u32,
        peak_hour: f64,
        spread_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            total_volume,
            priority,
            shape: DemandShape::Gaussian {
                peak_hour,
                spread_hours,
            },
        }
    }

    /// Uniformly spread source.
    pub fn linear(id: impl Into<String>, total_volume: f64, priority: u32) -> Self {
        Self {
            id: id.into(),
            total_volume,
            priority,
            shape: DemandShape::Linear,
        }
    }

    /// Check this source in isolation (uniqueness is checked by the config).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::EmptySourceId);
        }

        if !self.total_volume.is_finite() || self.total_volume < 0.0 {
            return Err(ConfigError::InvalidVolume {
                source_id: self.id.clone(),
                volume: self.total_volume,
            });
        }

        if self.priority == 0 {
            return Err(ConfigError::InvalidPriority {
                source_id: self.id.clone(),
            });
        }

        if let DemandShape::Gaussian {
            peak_hour,
            spread_hours,
        } = self.shape
        {
            if !spread_hours.is_finite() || spread_hours <= 0.0 {
                return Err(ConfigError::InvalidSpread {
                    source_id: self.id.clone(),
                    spread_hours,
                });
            }
            if !peak_hour.is_finite() || !(0.0..24.0).contains(&peak_hour) {
                return Err(ConfigError::InvalidPeakHour {
                    source_id: self.id.clone(),
                    peak_hour,
                });
            }
        }

        Ok(())
    }
}

/// Dense per-minute demand for one source. Read-only once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandTrace {
    values: Vec<f64>,
}

impl DemandTrace {
    /// Demand at `minute` (zero past the end of the horizon)
    pub fn at(&self, minute: usize) -> f64 {
        self.values.get(minute).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all entries
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest single-minute demand
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Generate the per-minute demand trace for a source.
///
/// # Errors
///
/// Returns the source's validation error (for instance a non-positive
/// Gaussian spread) instead of evaluating a degenerate kernel.
pub fn generate_trace(
    source: &DemandSource,
    horizon_minutes: usize,
) -> Result<DemandTrace, ConfigError> {
    source.validate()?;

    if horizon_minutes == 0 {
        return Ok(DemandTrace { values: Vec::new() });
    }

    let values = match source.shape {
        DemandShape::Linear => {
            let per_minute = source.total_volume / horizon_minutes as f64;
            vec![per_minute; horizon_minutes]
        }
        DemandShape::Gaussian {
            peak_hour,
            spread_hours,
        } => {
            let mean = peak_hour * MINUTES_PER_HOUR;
            let std_dev = spread_hours * MINUTES_PER_HOUR;
            let scale = source.total_volume / (std_dev * (2.0 * std::f64::consts::PI).sqrt());

            (0..horizon_minutes)
                .map(|minute| {
                    let z = (minute as f64 - mean) / std_dev;
                    scale * (-0.5 * z * z).exp()
                })
                .collect()
        }
    };

    Ok(DemandTrace { values })
}
