// End-of-horizon drain
//
// Whatever is still queued after the final minute is shed regardless of age,
// and each amount is attributed to the source that owned it.

use crate::arrivals::DemandSource;
use crate::config::SimulationConfig;
use crate::models::Event;
use crate::orchestrator::engine::Orchestrator;

#[test]
fn test_drain_sheds_items_younger_than_timeout() {
    // Timeout longer than the horizon: nothing can expire by age
    let config = SimulationConfig::new(5.0, 500)
        .with_source(DemandSource::linear("hot", 600.0, 1))
        .with_source(DemandSource::linear("cold", 120.0, 2))
        .with_horizon(60);
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run_to_completion().unwrap();

    let state = orchestrator.state();
    let hot = state.ledger(0).unwrap();
    let cold = state.ledger(1).unwrap();

    // hot: 10/min against 5/min capacity, cold never served
    assert_eq!(hot.shed_timeout(), 0.0);
    assert_eq!(cold.shed_timeout(), 0.0);
    assert_eq!(hot.total_served(), 300.0);
    assert_eq!(hot.shed_end_of_horizon(), 300.0);
    assert_eq!(cold.total_served(), 0.0);
    assert_eq!(cold.shed_end_of_horizon(), 120.0);
}

#[test]
fn test_drain_events_attributed_per_source() {
    let config = SimulationConfig::new(0.0, 1440)
        .with_source(DemandSource::linear("a", 100.0, 1))
        .with_source(DemandSource::linear("b", 0.0, 1))
        .with_source(DemandSource::linear("c", 50.0, 3))
        .with_horizon(10);
    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run_to_completion().unwrap();

    let drains = orchestrator.event_log().events_of_type("HorizonDrain");
    // Source "b" never queued anything, so it has no drain event
    assert_eq!(drains.len(), 2);

    match drains[0] {
        Event::HorizonDrain {
            minute,
            source_id,
            amount,
            items,
        } => {
            assert_eq!(*minute, 9);
            assert_eq!(source_id, "a");
            assert_eq!(*amount, 100.0);
            assert_eq!(*items, 10);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(drains[1].source_id(), Some("c"));
    assert_eq!(drains[1].shed_amount(), 50.0);
}
