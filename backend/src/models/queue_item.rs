//! Queue item model
//!
//! A queue item is one minute's worth of unserved demand from one source.
//! Each item has:
//! - Arrival minute (when the demand was generated, never re-stamped)
//! - Original and remaining magnitude
//! - Owning source index
//!
//! Items are served in place; a partially served item keeps its original
//! arrival minute, so it keeps ageing towards its timeout.

use serde::{Deserialize, Serialize};

/// Unserved demand belonging to one source
///
/// # Example
/// ```
/// use capacity_simulator_core_rs::QueueItem;
///
/// let mut item = QueueItem::new(0, 10, 150.0);
/// assert_eq!(item.serve(100.0), 100.0);
/// assert_eq!(item.remaining(), 50.0);
/// assert_eq!(item.age_at(25), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Index of the owning source in config order
    source: usize,

    /// Minute the demand first arrived
    arrival_minute: usize,

    /// Magnitude at arrival
    amount: f64,

    /// Magnitude still unserved
    remaining: f64,
}

impl QueueItem {
    /// Create a new item with nothing served yet
    ///
    /// # Panics
    /// Panics if amount is negative or not finite
    pub fn new(source: usize, arrival_minute: usize, amount: f64) -> Self {
        assert!(
            amount.is_finite() && amount >= 0.0,
            "amount must be finite and non-negative"
        );
        Self {
            source,
            arrival_minute,
            amount,
            remaining: amount,
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn arrival_minute(&self) -> usize {
        self.arrival_minute
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Magnitude served so far
    pub fn served(&self) -> f64 {
        self.amount - self.remaining
    }

    /// Minutes since arrival, measured at `minute`
    pub fn age_at(&self, minute: usize) -> usize {
        minute.saturating_sub(self.arrival_minute)
    }

    /// True once the item has waited longer than `timeout` minutes
    pub fn is_expired_at(&self, minute: usize, timeout: usize) -> bool {
        self.age_at(minute) > timeout
    }

    /// Nothing left to serve
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Serve up to `amount`, returning what was actually served.
    ///
    /// The served amount is clamped to `[0, remaining]`, so `remaining` never
    /// goes negative.
    pub fn serve(&mut self, amount: f64) -> f64 {
        let served = amount.max(0.0).min(self.remaining);
        if served >= self.remaining {
            self.remaining = 0.0;
        } else {
            self.remaining -= served;
        }
        served
    }

    /// Serve everything left
    pub fn serve_all(&mut self) -> f64 {
        let served = self.remaining;
        self.remaining = 0.0;
        served
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "amount must be finite and non-negative")]
    fn test_negative_amount_panics() {
        QueueItem::new(0, 0, -1.0);
    }

    #[test]
    fn test_serve_clamps_to_remaining() {
        let mut item = QueueItem::new(0, 0, 40.0);
        assert_eq!(item.serve(100.0), 40.0);
        assert!(item.is_exhausted());
        assert_eq!(item.serve(5.0), 0.0);
    }

    #[test]
    fn test_serve_ignores_negative_amount() {
        let mut item = QueueItem::new(0, 0, 40.0);
        assert_eq!(item.serve(-5.0), 0.0);
        assert_eq!(item.remaining(), 40.0);
    }

    #[test]
    fn test_partial_service_keeps_arrival_minute() {
        let mut item = QueueItem::new(1, 7, 10.0);
        item.serve(4.0);
        assert_eq!(item.arrival_minute(), 7);
        assert_eq!(item.served(), 4.0);
        assert!(!item.is_expired_at(37, 30));
        assert!(item.is_expired_at(38, 30));
    }
}
