//! Time management for the simulation
//!
//! The simulation operates in discrete one-minute ticks over a fixed horizon.
//! The horizon is one simulated day unless a config overrides it.

use serde::{Deserialize, Serialize};

/// Minutes in one simulated day (the default horizon)
pub const MINUTES_PER_DAY: usize = 1440;

/// Minutes per hour, used to convert time-of-day parameters into minute offsets
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Manages simulation time in discrete minutes over a fixed horizon
///
/// # Example
/// ```
/// use capacity_simulator_core_rs::TimeManager;
///
/// let mut time = TimeManager::new(1440);
/// assert_eq!(time.current_minute(), 0);
///
/// time.advance_minute();
/// assert_eq!(time.current_minute(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeManager {
    /// Minutes elapsed since simulation start
    current_minute: usize,
    /// Number of minutes in the horizon
    horizon_minutes: usize,
}

impl TimeManager {
    /// Create a new TimeManager
    ///
    /// # Arguments
    /// * `horizon_minutes` - Number of minutes simulated before the forced drain
    pub fn new(horizon_minutes: usize) -> Self {
        assert!(horizon_minutes > 0, "horizon_minutes must be positive");
        Self {
            current_minute: 0,
            horizon_minutes,
        }
    }

    /// Resume a clock at a given minute (used when restoring a checkpoint)
    pub(crate) fn at_minute(horizon_minutes: usize, current_minute: usize) -> Self {
        let mut time = Self::new(horizon_minutes);
        time.current_minute = current_minute.min(horizon_minutes);
        time
    }

    /// Advance time by one minute
    pub fn advance_minute(&mut self) {
        self.current_minute += 1;
    }

    /// Get the current minute (0-indexed)
    pub fn current_minute(&self) -> usize {
        self.current_minute
    }

    /// Get the fractional hour-of-day for the current minute
    ///
    /// # Example
    /// ```
    /// use capacity_simulator_core_rs::TimeManager;
    ///
    /// let mut time = TimeManager::new(1440);
    /// for _ in 0..90 {
    ///     time.advance_minute();
    /// }
    /// assert_eq!(time.hour_of_day(), 1.5);
    /// ```
    pub fn hour_of_day(&self) -> f64 {
        (self.current_minute % MINUTES_PER_DAY) as f64 / MINUTES_PER_HOUR
    }

    /// Check if the current minute is the last one of the horizon
    pub fn is_final_minute(&self) -> bool {
        self.current_minute + 1 == self.horizon_minutes
    }

    /// Check if every minute of the horizon has been simulated
    pub fn is_complete(&self) -> bool {
        self.current_minute >= self.horizon_minutes
    }

    /// Minutes left to simulate, including the current one
    pub fn remaining_minutes(&self) -> usize {
        self.horizon_minutes.saturating_sub(self.current_minute)
    }

    /// Get the horizon length in minutes
    pub fn horizon_minutes(&self) -> usize {
        self.horizon_minutes
    }
}
