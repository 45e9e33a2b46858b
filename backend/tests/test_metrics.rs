//! Metrics aggregation tests

use capacity_simulator_core_rs::metrics::{compute_metrics, peak_average};
use capacity_simulator_core_rs::{
    run, DemandSource, Orchestrator, SimulationConfig, PEAK_WINDOW_MINUTES,
};

fn unconstrained() -> SimulationConfig {
    SimulationConfig::new(10_000.0, 30)
        .with_source(DemandSource::gaussian("web", 100_000.0, 1, 15.0, 3.0))
        .with_source(DemandSource::linear("batch", 14_400.0, 2))
}

#[test]
fn test_metrics_are_idempotent() {
    let mut orchestrator = Orchestrator::new(unconstrained()).unwrap();
    orchestrator.run_to_completion().unwrap();

    let first = orchestrator.metrics();
    let second = orchestrator.metrics();
    assert_eq!(first, second);

    let recomputed = compute_metrics(
        orchestrator.state().trace(),
        orchestrator.state().ledgers(),
        &orchestrator.config().sources,
        orchestrator.config().capacity,
        orchestrator.config().horizon_minutes,
    );
    assert_eq!(first, recomputed);
}

#[test]
fn test_peak_is_mean_of_busiest_window() {
    let mut orchestrator = Orchestrator::new(unconstrained()).unwrap();
    orchestrator.run_to_completion().unwrap();

    // Nothing queues, so served per minute equals demand per minute
    let demand: Vec<f64> = (0..1440)
        .map(|m| orchestrator.traces().iter().map(|t| t.at(m)).sum())
        .collect();
    let mut sorted = demand.clone();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let expected = sorted[..PEAK_WINDOW_MINUTES].iter().sum::<f64>() / 180.0;

    let metrics = orchestrator.metrics();
    assert!((metrics.aggregate.peak_utilization - expected).abs() < 1e-9);
    assert!(metrics.aggregate.peak_utilization > metrics.aggregate.average_utilization);
}

#[test]
fn test_per_source_peak_uses_own_window() {
    let output = run(unconstrained()).unwrap();

    let batch = &output.per_source["batch"];
    assert_eq!(batch.peak_utilization, 10.0);
    assert_eq!(batch.average_utilization, 10.0);
    assert_eq!(batch.priority, 2);

    let web = &output.per_source["web"];
    assert!(web.peak_utilization > web.average_utilization);
    assert!(output.metrics.peak_utilization <= web.peak_utilization + batch.peak_utilization);
}

#[test]
fn test_average_divides_by_full_horizon() {
    let config = SimulationConfig::new(100.0, 30)
        .with_source(DemandSource::linear("flat", 1440.0, 1));
    let mut orchestrator = Orchestrator::new(config).unwrap();

    for _ in 0..720 {
        orchestrator.tick().unwrap();
    }

    // Half the day served at 1/min: average over the whole day is 0.5
    let metrics = orchestrator.metrics();
    assert_eq!(metrics.aggregate.total_served, 720.0);
    assert_eq!(metrics.aggregate.average_utilization, 0.5);
    assert!((metrics.aggregate.average_percent - 0.5).abs() < 1e-12);
}

#[test]
fn test_percentages_in_percent_units() {
    let config = SimulationConfig::new(200.0, 30)
        .with_source(DemandSource::linear("half", 144_000.0, 1));
    let output = run(config).unwrap();

    assert_eq!(output.metrics.peak_percent, 50.0);
    assert_eq!(output.metrics.average_percent, 50.0);
    assert_eq!(output.metrics.shed_percent, 0.0);
}

#[test]
fn test_zero_volume_source_reports_nan_shed_percent() {
    let config = SimulationConfig::new(100.0, 30)
        .with_source(DemandSource::linear("idle", 0.0, 1));
    let output = run(config).unwrap();

    let idle = &output.per_source["idle"];
    assert_eq!(idle.total_served, 0.0);
    assert_eq!(idle.total_shed, 0.0);
    assert!(idle.shed_percent.is_nan());
    assert!(output.metrics.shed_percent.is_nan());

    let json: serde_json::Value = serde_json::from_str(&output.to_json(false).unwrap()).unwrap();
    assert!(json["per_source"]["idle"]["shed_percent"].is_null());
    assert!(json["metrics"]["shed_percent"].is_null());
}

#[test]
fn test_peak_average_short_input() {
    assert_eq!(peak_average(&[4.0, 2.0], PEAK_WINDOW_MINUTES), 3.0);
    assert_eq!(peak_average(&[f64::MIN_POSITIVE], 0), 0.0);
}
