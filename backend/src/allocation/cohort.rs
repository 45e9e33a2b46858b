//! Cohort-based serving within one priority group
//!
//! All member queues of a group are merged into one candidate set. Because
//! every queue is sorted by arrival minute, the merge is a k-way walk with one
//! cursor per member: each step gathers the next cohort (every item sharing
//! the oldest unvisited arrival minute) and serves it.

use crate::allocation::priority::PriorityGroup;
use crate::models::source_queue::SourceQueue;

/// Result of serving one priority group for one minute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupAllocation {
    /// Demand served from this group
    pub served: f64,

    /// Capacity left for lower-priority groups
    pub remaining_capacity: f64,

    /// Demand still queued in this group after serving
    pub unserved: f64,

    /// Number of cohorts that received service
    pub cohorts_served: usize,
}

/// Serve one priority group from `capacity`.
///
/// `served_by_source` is indexed by source and accumulates what each member
/// received. Fully served items are compacted out of their queues before
/// returning.
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::allocation::{allocate_group, PriorityGroup};
/// use capacity_simulator_core_rs::SourceQueue;
///
/// let mut queues = vec![SourceQueue::new(0), SourceQueue::new(1)];
/// queues[0].admit(0, 30.0);
/// queues[1].admit(0, 10.0);
///
/// let group = PriorityGroup::new(1, vec![0, 1]);
/// let mut served = vec![0.0; 2];
/// let result = allocate_group(&mut queues, &group, 20.0, &mut served);
///
/// // Same arrival minute: capacity is split 3:1
/// assert_eq!(served, vec![15.0, 5.0]);
/// assert_eq!(result.remaining_capacity, 0.0);
/// assert_eq!(result.unserved, 20.0);
/// ```
pub fn allocate_group(
    queues: &mut [SourceQueue],
    group: &PriorityGroup,
    capacity: f64,
    served_by_source: &mut [f64],
) -> GroupAllocation {
    let members = group.members();
    let mut cursors = vec![0usize; members.len()];
    let mut available = capacity.max(0.0);
    let mut served = 0.0;
    let mut cohorts_served = 0;

    while available > 0.0 {
        // Oldest arrival minute not yet visited across all members
        let next_arrival = members
            .iter()
            .zip(&cursors)
            .filter_map(|(&source, &cursor)| {
                queues[source].items().get(cursor).map(|item| item.arrival_minute())
            })
            .min();

        let Some(arrival) = next_arrival else {
            break;
        };

        // (source, item index) for every item in this cohort
        let mut cohort = Vec::new();
        for (position, &source) in members.iter().enumerate() {
            let items = queues[source].items();
            while let Some(item) = items.get(cursors[position]) {
                if item.arrival_minute() != arrival {
                    break;
                }
                cohort.push((source, cursors[position]));
                cursors[position] += 1;
            }
        }

        let cohort_total: f64 = cohort
            .iter()
            .map(|&(source, index)| queues[source].items()[index].remaining())
            .sum();
        cohorts_served += 1;

        if cohort_total <= available {
            // Whole cohort fits
            for &(source, index) in &cohort {
                let amount = queues[source].items_mut()[index].serve_all();
                served_by_source[source] += amount;
                served += amount;
            }
            available -= cohort_total;
        } else {
            // Proportional split; the cohort consumes all remaining capacity
            let share = available / cohort_total;
            let mut left = available;
            for &(source, index) in &cohort {
                let item = &mut queues[source].items_mut()[index];
                let target = (item.remaining() * share).min(left);
                let amount = item.serve(target);
                left -= amount;
                served_by_source[source] += amount;
                served += amount;
            }
            available = 0.0;
        }
    }

    for &source in members {
        queues[source].compact();
    }

    let unserved = members
        .iter()
        .map(|&source| queues[source].total_remaining())
        .sum();

    GroupAllocation {
        served,
        remaining_capacity: available,
        unserved,
        cohorts_served,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queues_with(items: &[(usize, usize, f64)], num_sources: usize) -> Vec<SourceQueue> {
        let mut queues: Vec<SourceQueue> = (0..num_sources).map(SourceQueue::new).collect();
        for &(source, minute, amount) in items {
            queues[source].admit(minute, amount);
        }
        queues
    }

    #[test]
    fn test_oldest_cohort_served_first() {
        let mut queues = queues_with(&[(0, 0, 10.0), (0, 1, 10.0), (1, 1, 10.0)], 2);
        let group = PriorityGroup::new(1, vec![0, 1]);
        let mut served = vec![0.0; 2];

        let result = allocate_group(&mut queues, &group, 15.0, &mut served);

        // Cohort 0 (source 0 only) fully served, cohort 1 split 5.0 evenly
        assert_eq!(served, vec![12.5, 2.5]);
        assert_eq!(result.served, 15.0);
        assert_eq!(result.cohorts_served, 2);
        assert_eq!(queues[0].len(), 1);
        assert_eq!(queues[0].items()[0].arrival_minute(), 1);
    }

    #[test]
    fn test_leftover_capacity_returned() {
        let mut queues = queues_with(&[(0, 0, 4.0), (0, 1, 6.0)], 1);
        let group = PriorityGroup::new(1, vec![0]);
        let mut served = vec![0.0];

        let result = allocate_group(&mut queues, &group, 25.0, &mut served);

        assert_eq!(result.served, 10.0);
        assert_eq!(result.remaining_capacity, 15.0);
        assert_eq!(result.unserved, 0.0);
        assert!(queues[0].is_empty());
    }

    #[test]
    fn test_zero_capacity_serves_nothing() {
        let mut queues = queues_with(&[(0, 0, 4.0)], 1);
        let group = PriorityGroup::new(1, vec![0]);
        let mut served = vec![0.0];

        let result = allocate_group(&mut queues, &group, 0.0, &mut served);

        assert_eq!(result.served, 0.0);
        assert_eq!(result.cohorts_served, 0);
        assert_eq!(result.unserved, 4.0);
    }

    #[test]
    fn test_partial_cohort_never_exceeds_capacity() {
        let mut queues = queues_with(&[(0, 3, 1.0 / 3.0), (1, 3, 2.0 / 7.0), (2, 3, 0.1)], 3);
        let group = PriorityGroup::new(1, vec![0, 1, 2]);
        let mut served = vec![0.0; 3];

        let result = allocate_group(&mut queues, &group, 0.3, &mut served);

        assert!(result.served <= 0.3);
        assert_eq!(result.remaining_capacity, 0.0);
        for queue in &queues {
            assert!(queue.items().iter().all(|item| item.remaining() >= 0.0));
        }
    }

    #[test]
    fn test_non_member_queues_untouched() {
        let mut queues = queues_with(&[(0, 0, 5.0), (1, 0, 5.0)], 2);
        let group = PriorityGroup::new(2, vec![1]);
        let mut served = vec![0.0; 2];

        allocate_group(&mut queues, &group, 100.0, &mut served);

        assert_eq!(served, vec![0.0, 5.0]);
        assert_eq!(queues[0].total_remaining(), 5.0);
    }
}
