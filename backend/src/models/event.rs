//! Event logging for auditing where demand was lost.
//!
//! The engine records an event whenever demand leaves the system without
//! being served, and whenever a priority group is cut off because capacity
//! ran out. Events enable:
//! - Debugging (which source lost what, and when)
//! - Auditing (shed totals can be re-derived from the log)
//! - Analysis (how often lower priorities were starved)
//!
//! # Example
//!
//! ```rust
//! use capacity_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::TimeoutShed {
//!     minute: 42,
//!     source_id: "web".to_string(),
//!     arrival_minute: 11,
//!     amount: 12.5,
//! });
//!
//! assert_eq!(log.events_of_type("TimeoutShed").len(), 1);
//! assert_eq!(log.events_for_source("web")[0].minute(), 42);
//! ```

use serde::{Deserialize, Serialize};

/// Simulation event capturing a loss of demand or capacity exhaustion.
///
/// Events are logged in the order they occur within a minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A queued item waited longer than the timeout and was dropped
    TimeoutShed {
        minute: usize,
        source_id: String,
        arrival_minute: usize,
        amount: f64,
    },

    /// Capacity ran out while a priority group still had queued demand
    CapacityExhausted {
        minute: usize,
        priority: u32,
        unserved: f64,
    },

    /// Demand still queued at the end of the horizon was dropped
    HorizonDrain {
        minute: usize,
        source_id: String,
        amount: f64,
        items: usize,
    },
}

impl Event {
    /// Minute at which the event occurred
    pub fn minute(&self) -> usize {
        match self {
            Event::TimeoutShed { minute, .. } => *minute,
            Event::CapacityExhausted { minute, .. } => *minute,
            Event::HorizonDrain { minute, .. } => *minute,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TimeoutShed { .. } => "TimeoutShed",
            Event::CapacityExhausted { .. } => "CapacityExhausted",
            Event::HorizonDrain { .. } => "HorizonDrain",
        }
    }

    /// Source id if the event concerns one source
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Event::TimeoutShed { source_id, .. } => Some(source_id),
            Event::HorizonDrain { source_id, .. } => Some(source_id),
            Event::CapacityExhausted { .. } => None,
        }
    }

    /// Demand dropped by this event (zero for non-shedding events)
    pub fn shed_amount(&self) -> f64 {
        match self {
            Event::TimeoutShed { amount, .. } => *amount,
            Event::HorizonDrain { amount, .. } => *amount,
            Event::CapacityExhausted { .. } => 0.0,
        }
    }
}

/// Event log for storing and querying simulation events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific minute
    pub fn events_at_minute(&self, minute: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.minute() == minute).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific source
    pub fn events_for_source(&self, source_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.source_id() == Some(source_id))
            .collect()
    }

    /// Total demand dropped across all logged events
    pub fn total_shed(&self) -> f64 {
        self.events.iter().map(Event::shed_amount).sum()
    }
}
