//! Python bindings (enabled with the `pyo3` feature)
//!
//! Configs and reports cross the boundary as JSON strings, so the Python side
//! sees exactly the same schema as the CLI.

pub mod orchestrator;
pub mod types;
