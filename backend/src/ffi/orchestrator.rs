//! PyO3 wrapper for Orchestrator
//!
//! This module provides the Python interface to the Rust simulation engine.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{minute_result_to_py, parse_config, to_py_err};
use crate::orchestrator::{Orchestrator as RustOrchestrator, StateSnapshot};

/// Run a complete simulation from a JSON config and return the JSON report
///
/// # Example (from Python)
///
/// ```python
/// from capacity_simulator_core_rs import run_simulation
///
/// report = json.loads(run_simulation(json.dumps({
///     "capacity": 100,
///     "queue_timeout": 30,
///     "sources": [{"id": "web", "total_volume": 100000, "priority": 1,
///                  "shape": {"type": "gaussian", "peak_hour": 15, "spread_hours": 3}}],
/// })))
/// ```
#[pyfunction]
#[pyo3(signature = (config_json, pretty = false))]
pub fn run_simulation(py: Python<'_>, config_json: &str, pretty: bool) -> PyResult<String> {
    let config = parse_config(config_json)?;
    let output = py.allow_threads(|| crate::run(config)).map_err(to_py_err)?;
    output
        .to_json(pretty)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
}

/// Python wrapper for a steppable simulation
#[pyclass(name = "Simulation")]
pub struct PySimulation {
    inner: RustOrchestrator,
}

#[pymethods]
impl PySimulation {
    /// Create a simulation from a JSON config
    ///
    /// Raises ValueError if the config is malformed or rejected.
    #[new]
    fn new(config_json: &str) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let inner = RustOrchestrator::new(config).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Resume a simulation from a JSON snapshot taken with `snapshot()`
    #[staticmethod]
    fn from_snapshot(config_json: &str, snapshot_json: &str) -> PyResult<Self> {
        let config = parse_config(config_json)?;
        let snapshot = StateSnapshot::from_json(snapshot_json).map_err(to_py_err)?;
        let inner = RustOrchestrator::from_snapshot(config, snapshot).map_err(to_py_err)?;
        Ok(PySimulation { inner })
    }

    /// Simulate one minute and return its result as a dict
    fn tick(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self.inner.tick().map_err(to_py_err)?;
        minute_result_to_py(py, &result)
    }

    /// Simulate every remaining minute
    fn run_to_completion(&mut self) -> PyResult<()> {
        self.inner.run_to_completion().map_err(to_py_err)
    }

    fn current_minute(&self) -> usize {
        self.inner.current_minute()
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    fn config_hash(&self) -> String {
        self.inner.config_hash().to_string()
    }

    /// Report over the minutes simulated so far, as JSON
    #[pyo3(signature = (pretty = false))]
    fn output_json(&self, pretty: bool) -> PyResult<String> {
        self.inner
            .output()
            .to_json(pretty)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
    }

    /// Checkpoint of the run so far, as JSON
    fn snapshot(&self) -> PyResult<String> {
        self.inner.snapshot().to_json().map_err(to_py_err)
    }
}
