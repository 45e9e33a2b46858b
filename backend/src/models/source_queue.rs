//! Per-source queue of unserved demand
//!
//! Items are appended in arrival order (at most one per minute per source),
//! so the backing vector is always sorted by arrival minute. Expiry and
//! cleanup are explicit compaction passes run between allocation steps,
//! never removals in the middle of an iteration.

use crate::models::queue_item::QueueItem;
use serde::{Deserialize, Serialize};

/// Queue of unserved demand for one source
///
/// # Example
///
/// ```rust
/// use capacity_simulator_core_rs::SourceQueue;
///
/// let mut queue = SourceQueue::new(0);
/// queue.admit(0, 50.0);
/// queue.admit(1, 25.0);
/// assert_eq!(queue.total_remaining(), 75.0);
///
/// // Timeout of 0: everything older than the current minute expires
/// let expired = queue.expire(1, 0);
/// assert_eq!(expired.len(), 1);
/// assert_eq!(queue.total_remaining(), 25.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceQueue {
    /// Index of the owning source
    source: usize,

    /// Items ordered by arrival minute (oldest first)
    items: Vec<QueueItem>,
}

impl SourceQueue {
    pub fn new(source: usize) -> Self {
        Self {
            source,
            items: Vec::new(),
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [QueueItem] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Queue new demand arriving at `minute`
    ///
    /// Non-positive amounts are ignored. Returns true if an item was queued.
    pub fn admit(&mut self, minute: usize, amount: f64) -> bool {
        if amount.is_nan() || amount <= 0.0 {
            return false;
        }
        debug_assert!(
            self.items
                .last()
                .map_or(true, |last| last.arrival_minute() <= minute),
            "items must be admitted in arrival order"
        );
        self.items.push(QueueItem::new(self.source, minute, amount));
        true
    }

    /// Remove every item older than `timeout` at `minute`
    ///
    /// Returns the removed items with their unserved remainder intact.
    pub fn expire(&mut self, minute: usize, timeout: usize) -> Vec<QueueItem> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.is_expired_at(minute, timeout));
        self.items = kept;
        expired
    }

    /// Drop items with nothing left to serve
    pub fn compact(&mut self) {
        self.items.retain(|item| !item.is_exhausted());
    }

    /// Remove and return every item
    pub fn drain(&mut self) -> Vec<QueueItem> {
        std::mem::take(&mut self.items)
    }

    /// Sum of unserved magnitude across all items
    pub fn total_remaining(&self) -> f64 {
        self.items.iter().map(|item| item.remaining()).sum()
    }
}
