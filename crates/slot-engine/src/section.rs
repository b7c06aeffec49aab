//! Sections, groups of interchangeable sections, and the things a user
//! places on a schedule.

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::timeslot::{count_overlapping_pairs, Timeslot};

/// The kind of meeting a group of sections provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Lecture,
    Recitation,
    Lab,
    Design,
}

impl SectionKind {
    pub fn short_name(self) -> &'static str {
        match self {
            SectionKind::Lecture => "lec",
            SectionKind::Recitation => "rec",
            SectionKind::Lab => "lab",
            SectionKind::Design => "des",
        }
    }
}

/// One concrete alternative within a [`SectionGroup`], e.g. one specific
/// lecture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Raw time string as shown to users, e.g. "MW9-10.30".
    pub label: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
}

impl Section {
    pub fn new(label: impl Into<String>, timeslots: Vec<Timeslot>) -> Self {
        Section {
            label: label.into(),
            room: String::new(),
            timeslots,
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Number of (own timeslot, occupied timeslot) pairs that overlap.
    ///
    /// Not clamped: two meetings that both hit the same occupied span count
    /// as two conflicts.
    #[inline]
    pub fn count_conflicts(&self, occupied: &[Timeslot]) -> u32 {
        count_overlapping_pairs(&self.timeslots, occupied)
    }

    pub fn hours(&self) -> f64 {
        self.timeslots.iter().map(Timeslot::hours).sum()
    }
}

/// A manual choice for a [`SectionGroup`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLock {
    /// Let the search pick.
    #[default]
    Auto,
    /// Attend none of the sections.
    None,
    /// Always attend the section at this index.
    Section(usize),
}

/// Mutually exclusive sections of one kind for one class. At most one of
/// them is attended.
///
/// Serialized with a `lock` field holding a [`SectionLock`]; the selection of
/// an unlocked group is not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSectionGroup", into = "RawSectionGroup")]
pub struct SectionGroup {
    pub kind: SectionKind,
    pub sections: Vec<Section>,
    /// Locked groups are left out of the search. A locked group with no
    /// selection contributes nothing at all.
    locked: bool,
    /// Index into `sections`. Set by the user when locked, and by
    /// [`crate::schedule::select_option`] otherwise.
    selected: Option<usize>,
}

#[derive(Serialize, Deserialize)]
struct RawSectionGroup {
    kind: SectionKind,
    sections: Vec<Section>,
    #[serde(default)]
    lock: SectionLock,
}

impl TryFrom<RawSectionGroup> for SectionGroup {
    type Error = ScheduleError;

    fn try_from(raw: RawSectionGroup) -> Result<Self, Self::Error> {
        SectionGroup::new(raw.kind, raw.sections).locked_to(raw.lock)
    }
}

impl From<SectionGroup> for RawSectionGroup {
    fn from(group: SectionGroup) -> Self {
        RawSectionGroup {
            lock: group.lock(),
            kind: group.kind,
            sections: group.sections,
        }
    }
}

impl SectionGroup {
    pub fn new(kind: SectionKind, sections: Vec<Section>) -> Self {
        SectionGroup {
            kind,
            sections,
            locked: false,
            selected: None,
        }
    }

    /// Apply a manual choice.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::SectionIndexOutOfRange`] if the lock names a
    /// section this group does not have; the group is left unchanged.
    pub fn lock_section(&mut self, lock: SectionLock) -> Result<(), ScheduleError> {
        match lock {
            SectionLock::Auto => self.locked = false,
            SectionLock::None => {
                self.locked = true;
                self.selected = None;
            }
            SectionLock::Section(index) => {
                self.check_index(index)?;
                self.locked = true;
                self.selected = Some(index);
            }
        }
        Ok(())
    }

    /// Builder form of [`SectionGroup::lock_section`].
    pub fn locked_to(mut self, lock: SectionLock) -> Result<Self, ScheduleError> {
        self.lock_section(lock)?;
        Ok(self)
    }

    pub fn lock(&self) -> SectionLock {
        match (self.locked, self.selected) {
            (false, _) => SectionLock::Auto,
            (true, None) => SectionLock::None,
            (true, Some(index)) => SectionLock::Section(index),
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_section(&self) -> Option<&Section> {
        self.selected.and_then(|index| self.sections.get(index))
    }

    /// Record the search's pick for an unlocked group.
    pub(crate) fn set_selected(&mut self, index: usize) -> Result<(), ScheduleError> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), ScheduleError> {
        if index >= self.sections.len() {
            return Err(ScheduleError::SectionIndexOutOfRange {
                index,
                len: self.sections.len(),
            });
        }
        Ok(())
    }
}

/// A class the user has picked, e.g. "6.042", with one group per meeting kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub number: String,
    #[serde(default)]
    pub groups: Vec<SectionGroup>,
}

impl Class {
    pub fn new(number: impl Into<String>, groups: Vec<SectionGroup>) -> Self {
        Class {
            number: number.into(),
            groups,
        }
    }

    /// Weekly hours of the currently selected sections.
    pub fn hours(&self) -> f64 {
        self.groups
            .iter()
            .filter_map(SectionGroup::selected_section)
            .map(Section::hours)
            .sum()
    }
}

/// A user-defined block of busy time, e.g. "Gym". Always fixed in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonClassActivity {
    pub name: String,
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
}

impl NonClassActivity {
    pub fn new(name: impl Into<String>) -> Self {
        NonClassActivity {
            name: name.into(),
            timeslots: Vec::new(),
        }
    }

    /// Add a timeslot unless an equal one is already present. Returns whether
    /// it was added.
    pub fn add_timeslot(&mut self, timeslot: Timeslot) -> bool {
        if self.timeslots.contains(&timeslot) {
            return false;
        }
        self.timeslots.push(timeslot);
        true
    }

    /// Remove every timeslot equal to `timeslot`.
    pub fn remove_timeslot(&mut self, timeslot: &Timeslot) {
        self.timeslots.retain(|t| t != timeslot);
    }

    pub fn hours(&self) -> f64 {
        self.timeslots.iter().map(Timeslot::hours).sum()
    }
}
