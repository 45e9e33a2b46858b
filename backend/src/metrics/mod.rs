//! Metrics aggregation
//!
//! Reduces a finished (or in-progress) run to summary statistics, in
//! aggregate and per source. This is a pure function of the trace and the
//! ledgers: calling it twice on the same inputs gives identical results.
//!
//! # Non-finite values
//!
//! Percentages are reported in percent (0-100). A percentage whose
//! denominator is zero (zero capacity, zero-volume source) is `NaN`
//! (or infinite for a non-zero numerator). serde_json serializes these as
//! `null`.

use crate::arrivals::DemandSource;
use crate::models::state::{MinutePoint, SourceLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of busiest minutes averaged for peak utilization (three hours)
pub const PEAK_WINDOW_MINUTES: usize = 180;

/// System-wide metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Sum of all sources' configured volumes
    pub total_volume: f64,

    /// Served over the whole horizon
    pub total_served: f64,

    /// Mean served amount over the busiest `PEAK_WINDOW_MINUTES` minutes
    pub peak_utilization: f64,

    /// Total served divided by the horizon length
    pub average_utilization: f64,

    /// Peak utilization as a percentage of capacity (NaN when capacity is 0)
    pub peak_percent: f64,

    /// Average utilization as a percentage of capacity (NaN when capacity is 0)
    pub average_percent: f64,

    /// Shed by timeout and by the end-of-horizon drain
    pub total_shed: f64,

    /// Shed as a percentage of total volume (NaN when total volume is 0)
    pub shed_percent: f64,
}

/// Metrics for one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetrics {
    pub priority: u32,
    pub total_volume: f64,
    pub total_served: f64,
    /// Mean over this source's own busiest `PEAK_WINDOW_MINUTES` minutes
    pub peak_utilization: f64,
    pub average_utilization: f64,
    pub total_shed: f64,
    pub shed_timeout: f64,
    pub shed_end_of_horizon: f64,
    /// Shed as a percentage of this source's volume (NaN for a zero-volume source)
    pub shed_percent: f64,
}

/// Aggregate plus per-source metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub aggregate: AggregateMetrics,
    pub per_source: BTreeMap<String, SourceMetrics>,
}

/// Mean of the `window` largest values.
///
/// Values are stable-sorted descending, so ties resolve by original order.
/// With fewer than `window` values the mean is taken over all of them.
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::metrics::peak_average;
///
/// assert_eq!(peak_average(&[1.0, 9.0, 5.0, 7.0], 2), 8.0);
/// assert_eq!(peak_average(&[], 180), 0.0);
/// ```
pub fn peak_average(values: &[f64], window: usize) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let count = window.min(sorted.len());
    if count == 0 {
        return 0.0;
    }
    sorted[..count].iter().sum::<f64>() / count as f64
}

/// `numerator / denominator` expressed in percent
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    numerator / denominator * 100.0
}

/// Compute every metric for a run.
///
/// `ledgers[i]` must belong to `sources[i]`.
pub fn compute_metrics(
    trace: &[MinutePoint],
    ledgers: &[SourceLedger],
    sources: &[DemandSource],
    capacity: f64,
    horizon_minutes: usize,
) -> Metrics {
    let horizon = horizon_minutes as f64;

    let served: Vec<f64> = trace.iter().map(|point| point.served).collect();
    let total_served: f64 = served.iter().sum();
    let peak_utilization = peak_average(&served, PEAK_WINDOW_MINUTES);
    let average_utilization = total_served / horizon;

    let total_volume: f64 = sources.iter().map(|s| s.total_volume).sum();
    let total_shed: f64 = ledgers.iter().map(SourceLedger::total_shed).sum();

    let aggregate = AggregateMetrics {
        total_volume,
        total_served,
        peak_utilization,
        average_utilization,
        peak_percent: percent(peak_utilization, capacity),
        average_percent: percent(average_utilization, capacity),
        total_shed,
        shed_percent: percent(total_shed, total_volume),
    };

    let per_source = sources
        .iter()
        .zip(ledgers)
        .map(|(source, ledger)| {
            let metrics = source_metrics(source, ledger, horizon);
            (source.id.clone(), metrics)
        })
        .collect();

    Metrics {
        aggregate,
        per_source,
    }
}

fn source_metrics(source: &DemandSource, ledger: &SourceLedger, horizon: f64) -> SourceMetrics {
    let total_served: f64 = ledger.served_by_minute().iter().sum();
    let total_shed = ledger.total_shed();

    SourceMetrics {
        priority: source.priority,
        total_volume: source.total_volume,
        total_served,
        peak_utilization: peak_average(ledger.served_by_minute(), PEAK_WINDOW_MINUTES),
        average_utilization: total_served / horizon,
        total_shed,
        shed_timeout: ledger.shed_timeout(),
        shed_end_of_horizon: ledger.shed_end_of_horizon(),
        shed_percent: percent(total_shed, source.total_volume),
    }
}
