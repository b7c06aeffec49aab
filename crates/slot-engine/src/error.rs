//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Slot out of range: {0} (a week has 150 slots)")]
    SlotOutOfRange(u32),

    #[error("Invalid day: {0}")]
    InvalidDay(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Empty timeslot starting at slot {0}")]
    EmptyTimeslot(u8),

    #[error("Timeslot starting at slot {start} with {num_slots} slots crosses a day boundary")]
    CrossesDayBoundary { start: u8, num_slots: u8 },

    #[error("Section index {index} out of range for a group of {len} sections")]
    SectionIndexOutOfRange { index: usize, len: usize },

    #[error("Class {class} has no section group {group}")]
    UnknownGroup { class: usize, group: usize },

    #[error("Section group {group} has no sections to choose from")]
    EmptySectionGroup { group: usize },

    #[error("Group {group} of class {class} has no sections to choose from")]
    EmptyClassGroup { class: String, group: usize },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
