//! Allocation Module
//!
//! Splits one minute's capacity across the queued demand of every source.
//!
//! # Allocation Order
//!
//! ```text
//! capacity ─▶ priority group 1 ─▶ cohort (oldest arrival) ─▶ next cohort ─▶ ...
//!                    │ (leftover)
//!                    ▼
//!             priority group 2 ─▶ ...
//! ```
//!
//! - Groups are served strictly in priority order (1 first).
//! - Within a group, cohorts (items sharing one arrival minute) are served
//!   oldest-first.
//! - A cohort that does not fit in the remaining capacity is split
//!   proportionally to each item's remaining magnitude.
//!
//! # Critical Invariants
//!
//! 1. **Capacity Bound**: total served in a minute never exceeds the capacity
//! 2. **Non-negativity**: no item's remaining magnitude drops below zero
//! 3. **Strict Priority**: a group receives nothing while a higher group still
//!    has unserved demand

pub mod cohort;
pub mod priority;

// Re-export public API
pub use cohort::{allocate_group, GroupAllocation};
pub use priority::{build_priority_groups, PriorityGroup};
