//! Checkpoints for pausing and resuming a run
//!
//! A snapshot captures everything the minute loop mutates. Traces and
//! priority groups are rebuilt from the config on restore.
//!
//! # Critical Invariants
//!
//! - **Determinism**: resuming a snapshot and finishing gives the same output
//!   as an uninterrupted run
//! - **Conservation**: admitted demand equals served + shed + queued per source
//! - **Config Matching**: state can only be loaded with matching config

use crate::models::event::EventLog;
use crate::models::state::SimulationState;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Relative tolerance for the conservation check on restored ledgers
const CONSERVATION_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Mutable state of a run at a minute boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Next minute to simulate
    pub current_minute: usize,

    /// Hash of the config the run was started with
    pub config_hash: String,

    /// Queues, ledgers and trace
    pub state: SimulationState,

    /// Events logged so far
    pub event_log: EventLog,
}

impl StateSnapshot {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string(self).map_err(|e| {
            SimulationError::Serialization(format!("Snapshot serialization failed: {}", e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::Serialization(format!("Snapshot deserialization failed: {}", e))
        })
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Hex SHA-256 of a config's canonical JSON form
///
/// Object keys are sorted recursively, so two configs that deserialize to
/// the same value hash identically whatever their key order on disk.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    fn sort_keys(value: Value) -> Value {
        match value {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, sort_keys(field)))
                    .collect::<BTreeMap<_, _>>()
                    .into_iter()
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
            scalar => scalar,
        }
    }

    let json = serde_json::to_string(&sort_keys(value)).map_err(|e| {
        SimulationError::Serialization(format!("Config serialization failed: {}", e))
    })?;

    Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Check that a snapshot can be resumed under a config with
/// `num_sources` sources and a `horizon_minutes` horizon:
/// - Minute within the horizon
/// - One queue and ledger per source, one trace point per elapsed minute
/// - Per-source conservation of admitted demand
pub fn validate_snapshot(
    snapshot: &StateSnapshot,
    num_sources: usize,
    horizon_minutes: usize,
) -> Result<(), SimulationError> {
    if snapshot.current_minute > horizon_minutes {
        return Err(SimulationError::InvalidSnapshot(format!(
            "minute {} lies beyond the {}-minute horizon",
            snapshot.current_minute, horizon_minutes
        )));
    }

    if !snapshot
        .state
        .is_consistent(num_sources, snapshot.current_minute)
    {
        return Err(SimulationError::InvalidSnapshot(format!(
            "state does not match {} sources after {} minutes",
            num_sources, snapshot.current_minute
        )));
    }

    for (source, (queue, ledger)) in snapshot
        .state
        .queues()
        .iter()
        .zip(snapshot.state.ledgers())
        .enumerate()
    {
        let accounted = ledger.total_served() + ledger.total_shed() + queue.total_remaining();
        let admitted = ledger.total_demand();
        if (accounted - admitted).abs() > CONSERVATION_TOLERANCE * admitted.max(1.0) {
            return Err(SimulationError::InvalidSnapshot(format!(
                "source {}: admitted {} but accounted for {}",
                source, admitted, accounted
            )));
        }
    }

    Ok(())
}
