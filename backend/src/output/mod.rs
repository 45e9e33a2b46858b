//! Engine output for rendering layers
//!
//! The full per-minute trace stays inside the run for metrics; the output
//! carries a sampled copy (every `sample_interval`-th minute) enriched with a
//! per-source breakdown, plus the metrics computed over every minute.

use crate::arrivals::DemandTrace;
use crate::config::SimulationConfig;
use crate::metrics::{AggregateMetrics, Metrics, SourceMetrics};
use crate::models::state::{MinutePoint, SimulationState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sampled minute of the output trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampledPoint {
    #[serde(flatten)]
    pub point: MinutePoint,

    /// New demand per source at this minute
    pub demand_by_source: BTreeMap<String, f64>,

    /// Served amount per source at this minute
    pub served_by_source: BTreeMap<String, f64>,
}

/// Report of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// SHA-256 of the canonical config
    pub config_hash: String,
    pub capacity: f64,
    pub horizon_minutes: usize,
    pub sample_interval: usize,

    /// Sampled trace
    pub trace: Vec<SampledPoint>,

    /// Aggregate metrics over every simulated minute
    pub metrics: AggregateMetrics,

    /// Per-source metrics keyed by source id
    pub per_source: BTreeMap<String, SourceMetrics>,

    /// Demand shed by the end-of-horizon drain (included in `metrics.total_shed`)
    pub end_of_horizon_shed: f64,
}

impl SimulationOutput {
    pub(crate) fn from_run(
        config: &SimulationConfig,
        config_hash: &str,
        traces: &[DemandTrace],
        state: &SimulationState,
        metrics: Metrics,
    ) -> Self {
        // No sources means nothing to plot: the report carries no trace
        let trace = if config.sources.is_empty() {
            Vec::new()
        } else {
            state
                .trace()
                .iter()
                .step_by(config.sample_interval.max(1))
                .map(|point| sample_point(point, config, traces, state))
                .collect()
        };

        let end_of_horizon_shed = state.ledgers().iter().map(|l| l.shed_end_of_horizon()).sum();

        Self {
            config_hash: config_hash.to_string(),
            capacity: config.capacity,
            horizon_minutes: config.horizon_minutes,
            sample_interval: config.sample_interval,
            trace,
            metrics: metrics.aggregate,
            per_source: metrics.per_source,
            end_of_horizon_shed,
        }
    }

    /// Serialize the report as JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

fn sample_point(
    point: &MinutePoint,
    config: &SimulationConfig,
    traces: &[DemandTrace],
    state: &SimulationState,
) -> SampledPoint {
    let mut demand_by_source = BTreeMap::new();
    let mut served_by_source = BTreeMap::new();

    for ((source, trace), ledger) in config.sources.iter().zip(traces).zip(state.ledgers()) {
        demand_by_source.insert(source.id.clone(), trace.at(point.minute));
        let served = ledger
            .served_by_minute()
            .get(point.minute)
            .copied()
            .unwrap_or(0.0);
        served_by_source.insert(source.id.clone(), served);
    }

    SampledPoint {
        point: *point,
        demand_by_source,
        served_by_source,
    }
}
