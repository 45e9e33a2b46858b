//! Priority groups, computed once per run
//!
//! Priorities never change during a run, so sources are bucketed up front
//! into an ordered list of groups instead of being regrouped every minute.

use crate::arrivals::DemandSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sources sharing one priority level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityGroup {
    priority: u32,
    /// Source indices in config order
    members: Vec<usize>,
}

impl PriorityGroup {
    pub fn new(priority: u32, members: Vec<usize>) -> Self {
        Self { priority, members }
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }
}

/// Bucket sources by priority, highest priority (lowest value) first
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::arrivals::DemandSource;
/// use capacity_simulator_core_rs::allocation::build_priority_groups;
///
/// let sources = vec![
///     DemandSource::linear("batch", 10.0, 3),
///     DemandSource::linear("web", 10.0, 1),
///     DemandSource::linear("api", 10.0, 1),
/// ];
///
/// let groups = build_priority_groups(&sources);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].priority(), 1);
/// assert_eq!(groups[0].members(), &[1, 2]);
/// assert_eq!(groups[1].members(), &[0]);
/// ```
pub fn build_priority_groups(sources: &[DemandSource]) -> Vec<PriorityGroup> {
    let mut buckets: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (index, source) in sources.iter().enumerate() {
        buckets.entry(source.priority).or_default().push(index);
    }

    buckets
        .into_iter()
        .map(|(priority, members)| PriorityGroup::new(priority, members))
        .collect()
}
