//! Contiguous runs of slots and the overlap test between them.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::slot::{format_time, Slot, SLOTS_PER_DAY};

/// A contiguous span `[start, start + num_slots)` within a single day.
///
/// Construction validates the span, so every `Timeslot` in circulation is
/// non-empty and stays on one day. Serialized as the pair
/// `[start_slot, num_slots]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u8)", into = "(u32, u8)")]
pub struct Timeslot {
    start: Slot,
    num_slots: u8,
}

impl Timeslot {
    /// # Errors
    ///
    /// Returns [`ScheduleError::EmptyTimeslot`] if `num_slots` is zero and
    /// [`ScheduleError::CrossesDayBoundary`] if the span runs past 11:00 PM
    /// of its start day.
    pub fn new(start: Slot, num_slots: u8) -> Result<Self, ScheduleError> {
        if num_slots == 0 {
            return Err(ScheduleError::EmptyTimeslot(start.number()));
        }
        if u16::from(start.index_in_day()) + u16::from(num_slots) > u16::from(SLOTS_PER_DAY) {
            return Err(ScheduleError::CrossesDayBoundary {
                start: start.number(),
                num_slots,
            });
        }
        Ok(Timeslot { start, num_slots })
    }

    /// Build the span `[start, end)`. `end` is a slot number rather than a
    /// [`Slot`] because a span may end exactly at the end of Friday.
    pub fn from_start_end(start: Slot, end: u32) -> Result<Self, ScheduleError> {
        let start_number = u32::from(start.number());
        if end <= start_number {
            return Err(ScheduleError::EmptyTimeslot(start.number()));
        }
        let num_slots = u8::try_from(end - start_number).map_err(|_| {
            ScheduleError::CrossesDayBoundary {
                start: start.number(),
                num_slots: u8::MAX,
            }
        })?;
        Timeslot::new(start, num_slots)
    }

    #[inline]
    pub fn start(&self) -> Slot {
        self.start
    }

    #[inline]
    pub fn num_slots(&self) -> u8 {
        self.num_slots
    }

    /// Slot number just past the span.
    #[inline]
    pub fn end_slot(&self) -> u32 {
        u32::from(self.start.number()) + u32::from(self.num_slots)
    }

    /// Last slot number covered by the span.
    #[inline]
    pub fn end_inclusive(&self) -> u32 {
        self.end_slot() - 1
    }

    pub fn hours(&self) -> f64 {
        f64::from(self.num_slots) / 2.0
    }

    /// Whether the two spans share at least one slot.
    ///
    /// Symmetric and reflexive. Spans that only touch (one ends where the
    /// other begins) do not conflict.
    #[inline]
    pub fn conflicts(&self, other: &Timeslot) -> bool {
        u32::from(self.start.number()) <= other.end_inclusive()
            && u32::from(other.start.number()) <= self.end_inclusive()
    }
}

impl TryFrom<(u32, u8)> for Timeslot {
    type Error = ScheduleError;

    fn try_from((start, num_slots): (u32, u8)) -> Result<Self, Self::Error> {
        Timeslot::new(Slot::new(start)?, num_slots)
    }
}

impl From<Timeslot> for (u32, u8) {
    fn from(timeslot: Timeslot) -> Self {
        (u32::from(timeslot.start.number()), timeslot.num_slots)
    }
}

/// "Mon, 9:30 AM – 11:00 AM"
impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.start.start_time() + Duration::minutes(30 * i64::from(self.num_slots));
        write!(
            f,
            "{}, {} – {}",
            self.start.day_string(),
            self.start.time_string(),
            format_time(end)
        )
    }
}

/// Number of conflicting pairs between two lists of spans, counted with
/// multiplicity.
pub fn count_overlapping_pairs(left: &[Timeslot], right: &[Timeslot]) -> u32 {
    let mut conflicts = 0;
    for a in left {
        for b in right {
            if a.conflicts(b) {
                conflicts += 1;
            }
        }
    }
    conflicts
}

/// Number of conflicting pairs between spans of different lists. Pairs
/// within one list are never counted, since a section or activity does not
/// conflict with itself.
pub fn count_conflicts_across(lists: &[&[Timeslot]]) -> u32 {
    let mut conflicts = 0;
    for (i, left) in lists.iter().enumerate() {
        for right in &lists[i + 1..] {
            conflicts += count_overlapping_pairs(left, right);
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(start: u32, len: u8) -> Timeslot {
        Timeslot::new(Slot::new(start).unwrap(), len).unwrap()
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn test_new_rejects_empty() {
        let err = Timeslot::new(Slot::new(3).unwrap(), 0).unwrap_err();
        assert_eq!(err, ScheduleError::EmptyTimeslot(3));
    }

    #[test]
    fn test_new_rejects_crossing_midnight() {
        let err = Timeslot::new(Slot::new(28).unwrap(), 3).unwrap_err();
        assert!(err.to_string().contains("crosses a day boundary"), "got: {err}");
    }

    #[test]
    fn test_new_allows_ending_at_end_of_day() {
        let slot = ts(28, 2);
        assert_eq!(slot.end_slot(), 30);
        assert_eq!(slot.end_inclusive(), 29);
        let friday_close = ts(148, 2);
        assert_eq!(friday_close.end_slot(), 150);
    }

    #[test]
    fn test_from_start_end() {
        let slot = Timeslot::from_start_end(Slot::new(40).unwrap(), 43).unwrap();
        assert_eq!(slot, ts(40, 3));
        assert!(Timeslot::from_start_end(Slot::new(40).unwrap(), 40).is_err());
        assert!(Timeslot::from_start_end(Slot::new(0).unwrap(), 400).is_err());
    }

    #[test]
    fn test_hours() {
        assert_eq!(ts(0, 3).hours(), 1.5);
    }

    // ── conflicts ───────────────────────────────────────────────────────

    #[test]
    fn test_conflicts_overlap() {
        assert!(ts(10, 2).conflicts(&ts(11, 4)));
        assert!(ts(0, 4).conflicts(&ts(1, 1)));
    }

    #[test]
    fn test_conflicts_is_reflexive_and_symmetric() {
        let a = ts(10, 2);
        let b = ts(11, 1);
        assert!(a.conflicts(&a));
        assert_eq!(a.conflicts(&b), b.conflicts(&a));
    }

    #[test]
    fn test_adjacent_spans_do_not_conflict() {
        assert!(!ts(10, 2).conflicts(&ts(12, 2)));
        assert!(!ts(12, 2).conflicts(&ts(10, 2)));
    }

    #[test]
    fn test_same_time_on_different_days_does_not_conflict() {
        assert!(!ts(10, 2).conflicts(&ts(40, 2)));
    }

    #[test]
    fn test_count_overlapping_pairs_counts_multiplicity() {
        let section = [ts(0, 2), ts(30, 2)];
        let fixed = [ts(1, 1), ts(0, 1), ts(31, 1)];
        assert_eq!(count_overlapping_pairs(&section, &fixed), 3);
        assert_eq!(count_overlapping_pairs(&section, &[]), 0);
    }

    #[test]
    fn test_count_conflicts_across_skips_pairs_within_a_list() {
        let gym = [ts(20, 2), ts(20, 3)];
        assert_eq!(count_conflicts_across(&[&gym]), 0);

        let lecture = [ts(0, 4), ts(30, 2)];
        let band = [ts(1, 1), ts(2, 1), ts(10, 1)];
        assert_eq!(count_conflicts_across(&[&lecture, &band, &gym]), 2);
        assert_eq!(count_conflicts_across(&[]), 0);
    }

    // ── display / serde ─────────────────────────────────────────────────

    #[test]
    fn test_display() {
        assert_eq!(ts(3, 3).to_string(), "Mon, 9:30 AM – 11:00 AM");
        assert_eq!(ts(58, 2).to_string(), "Tue, 10:00 PM – 11:00 PM");
    }

    #[test]
    fn test_serde_raw_pair() {
        let slot = ts(40, 3);
        assert_eq!(serde_json::to_string(&slot).unwrap(), "[40,3]");
        let parsed: Timeslot = serde_json::from_str("[40,3]").unwrap();
        assert_eq!(parsed, slot);
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<Timeslot>("[28,3]").is_err());
        assert!(serde_json::from_str::<Timeslot>("[5,0]").is_err());
        assert!(serde_json::from_str::<Timeslot>("[200,1]").is_err());
    }
}
