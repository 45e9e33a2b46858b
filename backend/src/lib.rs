//! Capacity Simulator Core - Rust Engine
//!
//! Models how a fixed pool of capacity serves time-varying demand over one
//! simulated day, with strict priorities between sources, a finite queue
//! timeout and fair proportional sharing between simultaneous arrivals.
//!
//! # Architecture
//!
//! - **core**: Time management (minute clock over the horizon)
//! - **arrivals**: Demand curve generation (gaussian, linear)
//! - **models**: Domain types (QueueItem, SourceQueue, SimulationState, EventLog)
//! - **allocation**: Priority groups and cohort fair-share serving
//! - **orchestrator**: Main simulation loop and checkpoints
//! - **metrics**: Utilization and shedding summaries
//! - **config**: Run configuration and validation
//! - **output**: Sampled trace and report for rendering layers
//!
//! # Critical Invariants
//!
//! 1. Served + shed reproduces admitted demand, per source and in aggregate
//! 2. Served in any minute never exceeds capacity
//! 3. Runs are single-threaded and deterministic (same config, same output)
//!
//! # Example
//!
//! ```rust
//! use capacity_simulator_core_rs::{run, DemandSource, SimulationConfig};
//!
//! let config = SimulationConfig::new(100.0, 30)
//!     .with_source(DemandSource::gaussian("web", 100_000.0, 1, 15.0, 3.0));
//!
//! let output = run(config).unwrap();
//! let web = &output.per_source["web"];
//! assert!((web.total_served + web.total_shed - 100_000.0).abs() < 200.0);
//! ```

// Module declarations
pub mod allocation;
pub mod arrivals;
pub mod config;
pub mod core;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod output;

// Re-exports for convenience
pub use arrivals::{generate_trace, DemandShape, DemandSource, DemandTrace};
pub use config::{ConfigError, SimulationConfig};
pub use core::time::{TimeManager, MINUTES_PER_DAY};
pub use metrics::{AggregateMetrics, Metrics, SourceMetrics, PEAK_WINDOW_MINUTES};
pub use models::{
    event::{Event, EventLog},
    queue_item::QueueItem,
    source_queue::SourceQueue,
    state::{MinutePoint, SimulationState, SourceLedger},
};
pub use orchestrator::{MinuteResult, Orchestrator, SimulationError, StateSnapshot};
pub use output::{SampledPoint, SimulationOutput};

/// Run a whole simulation: validate, step every minute, drain and report.
pub fn run(config: SimulationConfig) -> Result<SimulationOutput, SimulationError> {
    Orchestrator::new(config)?.finish()
}

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn capacity_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::orchestrator::PySimulation>()?;
    m.add_function(wrap_pyfunction!(ffi::orchestrator::run_simulation, m)?)?;
    Ok(())
}
