//! # slot-engine
//!
//! Conflict-minimizing section assignment for weekly class schedules.
//!
//! Given the classes a student has picked, each made of groups of
//! interchangeable sections, plus fixed non-class activities, the engine
//! finds every way of picking one section per group that leaves the fewest
//! overlapping meetings. Sections can be locked by hand, in which case they
//! are treated as fixed.
//!
//! All computation is pure and deterministic: no I/O, no global state, and
//! identical inputs always give identical options in identical order.
//!
//! ## Modules
//!
//! - [`slot`] - The half-hour weekly grid (Monday to Friday, 8 AM to 11 PM)
//! - [`timeslot`] - Contiguous runs of slots and the overlap test
//! - [`section`] - Sections, section groups, locks, classes, and activities
//! - [`search`] - Branch-and-bound search for all minimum-conflict assignments
//! - [`schedule`] - Locked/free split, option selection, and "fits schedule"
//! - [`error`] - Error types

pub mod error;
pub mod schedule;
pub mod search;
pub mod section;
pub mod slot;
pub mod timeslot;

pub use error::ScheduleError;
pub use schedule::{
    fits_schedule, schedule_slots, schedule_slots_with_limits, select_option, GroupRef,
    ScheduleResult, SectionRef, TOO_MANY_OPTIONS,
};
pub use search::{
    find_best_assignments, Assignment, SearchLimits, SearchOutcome, SearchStatistics, Termination,
};
pub use section::{Class, NonClassActivity, Section, SectionGroup, SectionKind, SectionLock};
pub use slot::{Slot, DAYS_PER_WEEK, SLOTS_PER_DAY, SLOTS_PER_WEEK};
pub use timeslot::Timeslot;
