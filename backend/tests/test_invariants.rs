//! Property tests for run-wide invariants
//!
//! Random small configurations checked for conservation and the capacity
//! bound, plus a deterministic sweep for timeout monotonicity.

use capacity_simulator_core_rs::{run, DemandShape, DemandSource, Orchestrator, SimulationConfig};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn shape_strategy() -> impl Strategy<Value = DemandShape> {
    prop_oneof![
        Just(DemandShape::Linear),
        (0.0f64..4.0, 0.1f64..2.0).prop_map(|(peak_hour, spread_hours)| DemandShape::Gaussian {
            peak_hour,
            spread_hours,
        }),
    ]
}

fn source_strategy() -> impl Strategy<Value = (f64, u32, DemandShape)> {
    (0.0f64..20_000.0, 1u32..4, shape_strategy())
}

/// Configurations over a short horizon so each case stays fast
fn config_strategy() -> impl Strategy<Value = SimulationConfig> {
    (
        0.0f64..300.0,
        0usize..60,
        60usize..240,
        prop::collection::vec(source_strategy(), 0..5),
    )
        .prop_map(|(capacity, timeout, horizon, sources)| {
            sources.into_iter().enumerate().fold(
                SimulationConfig::new(capacity, timeout).with_horizon(horizon),
                |config, (index, (total_volume, priority, shape))| {
                    config.with_source(DemandSource {
                        id: format!("source-{}", index),
                        total_volume,
                        priority,
                        shape,
                    })
                },
            )
        })
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_served_plus_shed_reproduces_demand(config in config_strategy()) {
        let mut orchestrator = Orchestrator::new(config).unwrap();
        let generated: Vec<f64> = orchestrator.traces().iter().map(|t| t.total()).collect();
        orchestrator.run_to_completion().unwrap();

        for (ledger, demand) in orchestrator.state().ledgers().iter().zip(&generated) {
            prop_assert!(
                close(ledger.total_served() + ledger.total_shed(), *demand),
                "served {} + shed {} != demand {}",
                ledger.total_served(),
                ledger.total_shed(),
                demand
            );
        }
        prop_assert_eq!(orchestrator.state().total_queued(), 0.0);
    }

    #[test]
    fn prop_served_never_exceeds_capacity(config in config_strategy()) {
        let capacity = config.capacity;
        let mut orchestrator = Orchestrator::new(config).unwrap();
        orchestrator.run_to_completion().unwrap();

        for point in orchestrator.state().trace() {
            prop_assert!(point.served >= 0.0);
            prop_assert!(point.queued >= 0.0);
            prop_assert!(
                point.served <= capacity * (1.0 + 1e-12) + 1e-12,
                "minute {} served {} over capacity {}",
                point.minute,
                point.served,
                capacity
            );
        }
    }

    #[test]
    fn prop_items_never_outlive_timeout(config in config_strategy()) {
        let timeout = config.queue_timeout;
        let mut orchestrator = Orchestrator::new(config).unwrap();

        while !orchestrator.is_complete() {
            let minute = orchestrator.current_minute();
            orchestrator.tick().unwrap();
            for queue in orchestrator.state().queues() {
                for item in queue.items() {
                    prop_assert!(item.age_at(minute) <= timeout);
                    prop_assert!(item.remaining() > 0.0);
                }
            }
        }
    }

    #[test]
    fn prop_metrics_are_idempotent(config in config_strategy()) {
        let mut orchestrator = Orchestrator::new(config).unwrap();
        orchestrator.run_to_completion().unwrap();

        // Compared as JSON: NaN percentages serialize as null
        let first = serde_json::to_string(&orchestrator.metrics()).unwrap();
        let second = serde_json::to_string(&orchestrator.metrics()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_runs_are_reproducible(config in config_strategy()) {
        let first = run(config.clone()).unwrap();
        let second = run(config).unwrap();
        prop_assert_eq!(first.to_json(false).unwrap(), second.to_json(false).unwrap());
    }
}

// ============================================================================
// Timeout Monotonicity
// ============================================================================

fn total_shed_with_timeout(base: &SimulationConfig, timeout: usize) -> f64 {
    let mut config = base.clone();
    config.queue_timeout = timeout;
    run(config).unwrap().metrics.total_shed
}

fn assert_shed_non_increasing(base: SimulationConfig) {
    let timeouts = [0, 1, 5, 15, 30, 60, 120, 240, 720, 1440];
    let tolerance = 1e-9 * base.total_volume().max(1.0);

    let sheds: Vec<f64> = timeouts
        .iter()
        .map(|&timeout| total_shed_with_timeout(&base, timeout))
        .collect();

    for (window, pair) in timeouts.windows(2).zip(sheds.windows(2)) {
        assert!(
            pair[1] <= pair[0] + tolerance,
            "raising timeout {} -> {} increased shed {} -> {}",
            window[0],
            window[1],
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_monotonic_single_gaussian() {
    assert_shed_non_increasing(
        SimulationConfig::new(100.0, 30)
            .with_source(DemandSource::gaussian("web", 100_000.0, 1, 15.0, 3.0)),
    );
}

#[test]
fn test_monotonic_mixed_priorities() {
    assert_shed_non_increasing(
        SimulationConfig::new(120.0, 30)
            .with_source(DemandSource::gaussian("web", 80_000.0, 1, 10.0, 2.0))
            .with_source(DemandSource::gaussian("mobile", 60_000.0, 2, 18.0, 1.0))
            .with_source(DemandSource::linear("batch", 40_000.0, 3)),
    );
}

#[test]
fn test_monotonic_shared_priority() {
    assert_shed_non_increasing(
        SimulationConfig::new(90.0, 30)
            .with_source(DemandSource::gaussian("a", 70_000.0, 1, 12.0, 2.5))
            .with_source(DemandSource::gaussian("b", 30_000.0, 1, 13.0, 1.0)),
    );
}

#[test]
fn test_full_day_timeout_sheds_only_unserved_backlog() {
    // With a day-long timeout nothing ages out; all shedding is the final drain
    let config = SimulationConfig::new(100.0, 1440)
        .with_source(DemandSource::gaussian("web", 100_000.0, 1, 15.0, 3.0));
    let output = run(config).unwrap();

    let web = &output.per_source["web"];
    assert_eq!(web.shed_timeout, 0.0);
    assert_eq!(web.shed_end_of_horizon, web.total_shed);
}
