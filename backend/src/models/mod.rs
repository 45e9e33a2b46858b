//! Domain models for the capacity simulator

pub mod event;
pub mod queue_item;
pub mod source_queue;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use queue_item::QueueItem;
pub use source_queue::SourceQueue;
pub use state::{MinutePoint, SimulationState, SourceLedger};
