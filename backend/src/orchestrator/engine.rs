//! Orchestrator Engine
//!
//! Main simulation loop integrating all components:
//! - Demand generation (one analytic trace per source)
//! - Timeout expiry (shedding demand that waited too long)
//! - Admission (queueing this minute's demand)
//! - Allocation (strict priority, FIFO cohorts, proportional sharing)
//! - Recording (per-minute trace and per-source ledgers)
//! - End-of-horizon drain
//!
//! # Architecture
//!
//! ```text
//! For each minute t:
//! 1. Expire queued items older than the timeout (shed)
//! 2. Admit each source's demand at t as a new queue item
//! 3. Allocate capacity group by group (priority 1 first)
//! 4. Record served/queued/shed into the trace and ledgers
//! 5. On the final minute, shed everything still queued
//! 6. Advance time
//! ```
//!
//! # Example
//!
//! ```rust
//! use capacity_simulator_core_rs::{DemandSource, Orchestrator, SimulationConfig};
//!
//! let config = SimulationConfig::new(100.0, 30)
//!     .with_source(DemandSource::linear("api", 216_000.0, 1))
//!     .with_source(DemandSource::linear("batch", 144_000.0, 2));
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//!
//! // Step the first ten minutes by hand
//! for _ in 0..10 {
//!     let result = orchestrator.tick().unwrap();
//!     assert!(result.served <= 100.0);
//! }
//!
//! // Run the rest of the day and collect the report
//! let output = orchestrator.finish().unwrap();
//! assert_eq!(output.per_source["batch"].total_served, 0.0);
//! ```

use crate::allocation::{allocate_group, build_priority_groups, PriorityGroup};
use crate::arrivals::{generate_trace, DemandTrace};
use crate::config::{ConfigError, SimulationConfig};
use crate::core::time::TimeManager;
use crate::metrics::{compute_metrics, Metrics};
use crate::models::event::{Event, EventLog};
use crate::models::state::{MinutePoint, SimulationState};
use crate::orchestrator::checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
use crate::output::SimulationOutput;
use thiserror::Error;
use tracing::{debug, info, trace};

// ============================================================================
// Result and Error Types
// ============================================================================

/// Result of a single simulated minute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinuteResult {
    /// Minute number
    pub minute: usize,

    /// New demand admitted this minute
    pub demand: f64,

    /// Demand served this minute
    pub served: f64,

    /// Demand still queued after serving
    pub queued: f64,

    /// Demand shed by timeout this minute
    pub shed: f64,

    /// Number of queue items that timed out this minute
    pub num_expired: usize,

    /// Demand shed by the end-of-horizon drain (non-zero on the final minute only)
    pub drained: f64,
}

/// Simulation error types
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Horizon of {horizon} minutes already fully simulated")]
    HorizonComplete { horizon: usize },

    #[error("Snapshot config mismatch: expected hash {expected}, got {actual}")]
    SnapshotMismatch { expected: String, actual: String },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Owns all state for one simulation run and steps it minute by minute
///
/// The orchestrator is the only writer of its [`SimulationState`]. Runs are
/// deterministic: the same config always produces the same output, so
/// independent runs can execute on separate threads without sharing anything
/// but the (immutable) config.
pub struct Orchestrator {
    /// Validated configuration
    config: SimulationConfig,

    /// Demand per source per minute (index = source index)
    traces: Vec<DemandTrace>,

    /// Priority groups, highest priority first
    groups: Vec<PriorityGroup>,

    /// Queues, ledgers and trace
    state: SimulationState,

    /// Minute clock
    time_manager: TimeManager,

    /// Shedding and exhaustion events
    event_log: EventLog,

    /// SHA-256 of the canonical config, used to match checkpoints
    config_hash: String,
}

impl Orchestrator {
    /// Create new orchestrator from configuration
    ///
    /// Validates the config, generates every demand trace and precomputes the
    /// priority groups.
    ///
    /// # Errors
    ///
    /// * `SimulationError::InvalidConfig` - configuration rejected
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let traces = config
            .sources
            .iter()
            .map(|source| generate_trace(source, config.horizon_minutes))
            .collect::<Result<Vec<_>, _>>()?;

        let groups = build_priority_groups(&config.sources);
        let state = SimulationState::new(config.sources.len(), config.horizon_minutes);
        let time_manager = TimeManager::new(config.horizon_minutes);
        let config_hash = compute_config_hash(&config)?;

        info!(
            sources = config.sources.len(),
            groups = groups.len(),
            capacity = config.capacity,
            queue_timeout = config.queue_timeout,
            horizon = config.horizon_minutes,
            "orchestrator initialised"
        );

        Ok(Self {
            config,
            traces,
            groups,
            state,
            time_manager,
            event_log: EventLog::new(),
            config_hash,
        })
    }

    /// Resume a run from a checkpoint taken with [`Orchestrator::snapshot`]
    ///
    /// # Errors
    ///
    /// * `SimulationError::SnapshotMismatch` - snapshot was taken under a different config
    /// * `SimulationError::InvalidSnapshot` - snapshot is structurally inconsistent
    pub fn from_snapshot(
        config: SimulationConfig,
        snapshot: StateSnapshot,
    ) -> Result<Self, SimulationError> {
        let mut orchestrator = Self::new(config)?;

        if snapshot.config_hash != orchestrator.config_hash {
            return Err(SimulationError::SnapshotMismatch {
                expected: orchestrator.config_hash,
                actual: snapshot.config_hash,
            });
        }

        validate_snapshot(
            &snapshot,
            orchestrator.config.sources.len(),
            orchestrator.config.horizon_minutes,
        )?;

        orchestrator.time_manager =
            TimeManager::at_minute(orchestrator.config.horizon_minutes, snapshot.current_minute);
        orchestrator.state = snapshot.state;
        orchestrator.event_log = snapshot.event_log;

        debug!(
            minute = snapshot.current_minute,
            remaining = orchestrator.time_manager.remaining_minutes(),
            "orchestrator restored from snapshot"
        );

        Ok(orchestrator)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn current_minute(&self) -> usize {
        self.time_manager.current_minute()
    }

    /// True once every minute of the horizon has run (and the drain happened)
    pub fn is_complete(&self) -> bool {
        self.time_manager.is_complete()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn config_hash(&self) -> &str {
        &self.config_hash
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Demand traces, one per source in config order
    pub fn traces(&self) -> &[DemandTrace] {
        &self.traces
    }

    pub fn priority_groups(&self) -> &[PriorityGroup] {
        &self.groups
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Serializable checkpoint of the run so far
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            current_minute: self.current_minute(),
            config_hash: self.config_hash.clone(),
            state: self.state.clone(),
            event_log: self.event_log.clone(),
        }
    }

    // ========================================================================
    // Minute Loop Implementation
    // ========================================================================

    /// Execute one simulated minute
    ///
    /// # Errors
    ///
    /// * `SimulationError::HorizonComplete` - every minute has already run
    pub fn tick(&mut self) -> Result<MinuteResult, SimulationError> {
        if self.time_manager.is_complete() {
            return Err(SimulationError::HorizonComplete {
                horizon: self.time_manager.horizon_minutes(),
            });
        }

        let minute = self.current_minute();
        let hour = self.time_manager.hour_of_day();
        let num_sources = self.config.sources.len();

        // STEP 1: EXPIRE
        // Age counts from original arrival, partial service does not reset it
        let mut shed = 0.0;
        let mut num_expired = 0;
        for source in 0..num_sources {
            let expired = self.state.queues_mut()[source].expire(minute, self.config.queue_timeout);
            for item in expired {
                let amount = item.remaining();
                num_expired += 1;
                shed += amount;
                self.state.ledgers_mut()[source].record_timeout_shed(amount);
                self.event_log.log(Event::TimeoutShed {
                    minute,
                    source_id: self.config.sources[source].id.clone(),
                    arrival_minute: item.arrival_minute(),
                    amount,
                });
            }
        }

        // STEP 2: ADMIT
        // New demand joins its queue before any serving this minute
        let mut demand = 0.0;
        for (source, trace) in self.traces.iter().enumerate() {
            let amount = trace.at(minute);
            if self.state.queues_mut()[source].admit(minute, amount) {
                self.state.ledgers_mut()[source].record_demand(amount);
                demand += amount;
            }
        }

        // STEP 3: ALLOCATE
        let mut served_by_source = vec![0.0; num_sources];
        let mut available = self.config.capacity;
        for group in &self.groups {
            let allocation =
                allocate_group(self.state.queues_mut(), group, available, &mut served_by_source);
            available = allocation.remaining_capacity;

            if allocation.unserved > 0.0 && available <= 0.0 {
                self.event_log.log(Event::CapacityExhausted {
                    minute,
                    priority: group.priority(),
                    unserved: allocation.unserved,
                });
            }
        }

        // STEP 4: RECORD
        let served: f64 = served_by_source.iter().sum();
        for (ledger, amount) in self.state.ledgers_mut().iter_mut().zip(&served_by_source) {
            ledger.record_minute(*amount);
        }
        let queued = self.state.total_queued();
        self.state.record(MinutePoint {
            minute,
            demand,
            served,
            queued,
            shed,
            capacity: self.config.capacity,
        });

        trace!(minute, hour, demand, served, queued, shed, "minute complete");

        // STEP 5: END OF HORIZON
        let drained = if self.time_manager.is_final_minute() {
            self.drain_queues(minute)
        } else {
            0.0
        };

        // STEP 6: ADVANCE TIME
        self.time_manager.advance_minute();

        Ok(MinuteResult {
            minute,
            demand,
            served,
            queued,
            shed,
            num_expired,
            drained,
        })
    }

    /// Shed everything still queued, attributing it to the owning source
    fn drain_queues(&mut self, minute: usize) -> f64 {
        let mut total_drained = 0.0;

        for source in 0..self.config.sources.len() {
            let items = self.state.queues_mut()[source].drain();
            if items.is_empty() {
                continue;
            }

            let amount: f64 = items.iter().map(|item| item.remaining()).sum();
            total_drained += amount;
            self.state.ledgers_mut()[source].record_drain(amount);
            self.event_log.log(Event::HorizonDrain {
                minute,
                source_id: self.config.sources[source].id.clone(),
                amount,
                items: items.len(),
            });
        }

        debug!(minute, drained = total_drained, "end of horizon drain");
        total_drained
    }

    /// Run every remaining minute
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        while !self.is_complete() {
            self.tick()?;
        }
        Ok(())
    }

    /// Metrics over the minutes simulated so far
    pub fn metrics(&self) -> Metrics {
        compute_metrics(
            self.state.trace(),
            self.state.ledgers(),
            &self.config.sources,
            self.config.capacity,
            self.config.horizon_minutes,
        )
    }

    /// Output report for the minutes simulated so far
    pub fn output(&self) -> SimulationOutput {
        SimulationOutput::from_run(
            &self.config,
            &self.config_hash,
            &self.traces,
            &self.state,
            self.metrics(),
        )
    }

    /// Run any remaining minutes and produce the final report
    pub fn finish(mut self) -> Result<SimulationOutput, SimulationError> {
        self.run_to_completion()?;
        let output = self.output();

        info!(
            served = output.metrics.total_served,
            shed = output.metrics.total_shed,
            peak_percent = output.metrics.peak_percent,
            "simulation complete"
        );

        Ok(output)
    }
}

// Manual Debug implementation (traces and trace points are too large to print)
impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("current_minute", &self.current_minute())
            .field("num_sources", &self.config.sources.len())
            .field("num_groups", &self.groups.len())
            .field("capacity", &self.config.capacity)
            .field("event_count", &self.event_log.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
