//! Orchestrator - main simulation loop
//!
//! Implements the minute loop integrating all simulation components.
//!
//! See `engine.rs` for full implementation.

pub mod checkpoint;
pub mod engine;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use engine::{MinuteResult, Orchestrator, SimulationError};

// Re-export checkpoint types
pub use checkpoint::{compute_config_hash, validate_snapshot, StateSnapshot};
