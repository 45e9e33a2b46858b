//! Simulation State
//!
//! Mutable run-time state threaded through the minute loop: one queue and
//! one ledger per source (indexed by the source's position in the config),
//! plus the per-minute trace recorded so far.
//!
//! # Critical Invariants
//!
//! 1. **Conservation**: for every source, `total_demand == total_served + total_shed + queued`
//! 2. **Index Stability**: `queues[i]` and `ledgers[i]` both belong to source `i`
//! 3. **Append-only Trace**: one `MinutePoint` per simulated minute, never mutated

use crate::models::source_queue::SourceQueue;
use serde::{Deserialize, Serialize};

/// Outcome of one simulated minute, aggregated across sources
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinutePoint {
    /// Minute index within the horizon
    pub minute: usize,

    /// New demand generated this minute
    pub demand: f64,

    /// Demand served this minute
    pub served: f64,

    /// Demand still queued (unserved, not yet expired) after serving
    pub queued: f64,

    /// Demand shed by timeout this minute
    pub shed: f64,

    /// Capacity available this minute
    pub capacity: f64,
}

/// Running totals for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLedger {
    /// Served amount for every simulated minute
    served_by_minute: Vec<f64>,

    /// Demand admitted into the queue so far
    total_demand: f64,

    /// Demand served so far
    total_served: f64,

    /// Demand shed because it waited past the timeout
    shed_timeout: f64,

    /// Demand shed by the end-of-horizon drain
    shed_end_of_horizon: f64,
}

impl SourceLedger {
    pub fn new(horizon_minutes: usize) -> Self {
        Self {
            served_by_minute: Vec::with_capacity(horizon_minutes),
            total_demand: 0.0,
            total_served: 0.0,
            shed_timeout: 0.0,
            shed_end_of_horizon: 0.0,
        }
    }

    pub fn served_by_minute(&self) -> &[f64] {
        &self.served_by_minute
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    pub fn total_served(&self) -> f64 {
        self.total_served
    }

    pub fn shed_timeout(&self) -> f64 {
        self.shed_timeout
    }

    pub fn shed_end_of_horizon(&self) -> f64 {
        self.shed_end_of_horizon
    }

    /// Shed from both causes
    pub fn total_shed(&self) -> f64 {
        self.shed_timeout + self.shed_end_of_horizon
    }

    pub(crate) fn record_demand(&mut self, amount: f64) {
        self.total_demand += amount;
    }

    /// Close out a minute with the amount served during it
    pub(crate) fn record_minute(&mut self, served: f64) {
        self.served_by_minute.push(served);
        self.total_served += served;
    }

    pub(crate) fn record_timeout_shed(&mut self, amount: f64) {
        self.shed_timeout += amount;
    }

    pub(crate) fn record_drain(&mut self, amount: f64) {
        self.shed_end_of_horizon += amount;
    }
}

/// Complete mutable state for one simulation run
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::SimulationState;
///
/// let state = SimulationState::new(2, 1440);
/// assert_eq!(state.num_sources(), 2);
/// assert_eq!(state.total_queued(), 0.0);
/// assert!(state.trace().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    queues: Vec<SourceQueue>,
    ledgers: Vec<SourceLedger>,
    trace: Vec<MinutePoint>,
}

impl SimulationState {
    /// Empty state for `num_sources` sources
    pub fn new(num_sources: usize, horizon_minutes: usize) -> Self {
        Self {
            queues: (0..num_sources).map(SourceQueue::new).collect(),
            ledgers: (0..num_sources)
                .map(|_| SourceLedger::new(horizon_minutes))
                .collect(),
            trace: Vec::with_capacity(horizon_minutes),
        }
    }

    pub fn num_sources(&self) -> usize {
        self.queues.len()
    }

    pub fn queues(&self) -> &[SourceQueue] {
        &self.queues
    }

    pub fn queue(&self, source: usize) -> Option<&SourceQueue> {
        self.queues.get(source)
    }

    pub(crate) fn queues_mut(&mut self) -> &mut [SourceQueue] {
        &mut self.queues
    }

    pub fn ledgers(&self) -> &[SourceLedger] {
        &self.ledgers
    }

    pub fn ledger(&self, source: usize) -> Option<&SourceLedger> {
        self.ledgers.get(source)
    }

    pub(crate) fn ledgers_mut(&mut self) -> &mut [SourceLedger] {
        &mut self.ledgers
    }

    /// Per-minute trace recorded so far
    pub fn trace(&self) -> &[MinutePoint] {
        &self.trace
    }

    pub(crate) fn record(&mut self, point: MinutePoint) {
        self.trace.push(point);
    }

    /// Unserved demand across every queue
    pub fn total_queued(&self) -> f64 {
        self.queues.iter().map(SourceQueue::total_remaining).sum()
    }

    pub fn total_served(&self) -> f64 {
        self.ledgers.iter().map(SourceLedger::total_served).sum()
    }

    pub fn total_shed(&self) -> f64 {
        self.ledgers.iter().map(SourceLedger::total_shed).sum()
    }

    /// Check the structural invariants (used when restoring a checkpoint)
    pub fn is_consistent(&self, num_sources: usize, minutes_elapsed: usize) -> bool {
        self.queues.len() == num_sources
            && self.ledgers.len() == num_sources
            && self.trace.len() == minutes_elapsed
            && self
                .queues
                .iter()
                .enumerate()
                .all(|(i, q)| q.source() == i && q.items().iter().all(|item| item.source() == i))
            && self
                .ledgers
                .iter()
                .all(|l| l.served_by_minute().len() == minutes_elapsed)
    }
}
