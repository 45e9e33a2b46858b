//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::SimulationConfig;
use crate::orchestrator::{MinuteResult, SimulationError};

/// Map a simulation error onto the closest Python exception
///
/// Rejected configs become `ValueError`; everything else is a `RuntimeError`.
pub fn to_py_err(error: SimulationError) -> PyErr {
    match error {
        SimulationError::InvalidConfig(_) => {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(error.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(error.to_string()),
    }
}

/// Parse and validate a JSON config string
pub fn parse_config(config_json: &str) -> PyResult<SimulationConfig> {
    SimulationConfig::from_json(config_json)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

/// Convert a minute result into a Python dict
pub fn minute_result_to_py(py: Python<'_>, result: &MinuteResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("minute", result.minute)?;
    dict.set_item("demand", result.demand)?;
    dict.set_item("served", result.served)?;
    dict.set_item("queued", result.queued)?;
    dict.set_item("shed", result.shed)?;
    dict.set_item("num_expired", result.num_expired)?;
    dict.set_item("drained", result.drained)?;
    Ok(dict.unbind())
}
