//! Scheduling algorithms.
//!
//! # Components
//!
//! - [`conflicts`]: conflict detection over draft entries and conflict queries
//! - [`availability`]: which courses may be placed into a slot
//!
//! # Example
//!
//! ```
//! use flexwise_scheduler::algorithms::detect_conflicts;
//! use flexwise_scheduler::models::{ReferenceData, ScheduleEntry};
//!
//! let entries = vec![
//!     ScheduleEntry::period_slot(1, "p1").with_teachers(["t1"]).with_class("5a"),
//!     ScheduleEntry::period_slot(1, "p1").with_teachers(["t1"]).with_class("6b"),
//! ];
//! let conflicts = detect_conflicts(&entries, &ReferenceData::default());
//! assert!(!conflicts.is_empty());
//! ```

pub mod availability;
pub mod conflicts;

pub use availability::get_available_courses_for_slot;
pub use conflicts::{
    detect_conflicts, get_auto_resolvable_conflicts, get_conflicts_for_lesson,
    get_conflicts_for_slot, group_by_slot, group_conflicts_by_type, has_blocking_conflicts,
    missing_fields, ConflictSummary,
};
