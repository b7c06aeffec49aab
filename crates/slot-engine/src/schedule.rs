//! From selected classes and activities to schedule options.
//!
//! This is the layer the rest of an application talks to. It splits every
//! class's section groups into locked ones, whose chosen section becomes a
//! fixed timeslot, and free ones that go to the search. Non-class activities
//! are always fixed. After a search, [`select_option`] writes one option back
//! into the groups so a calendar can render the selected sections.

use std::iter;

use log::debug;
use serde::Serialize;

use crate::error::ScheduleError;
use crate::search::{find_best_assignments, SearchLimits, SearchStatistics, Termination};
use crate::section::{Class, NonClassActivity, Section, SectionGroup};
use crate::timeslot::{count_conflicts_across, Timeslot};

/// Past this many options, a user interface should suggest locking sections.
pub const TOO_MANY_OPTIONS: usize = 15;

/// Position of a section group among the selected classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupRef {
    pub class: usize,
    pub group: usize,
}

/// Position of one section among the selected classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SectionRef {
    pub class: usize,
    pub group: usize,
    pub section: usize,
}

/// The schedules found for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResult {
    /// Groups the search chose sections for, in branching order.
    pub free_groups: Vec<GroupRef>,
    /// Every best option; each holds one section per entry of `free_groups`.
    pub options: Vec<Vec<SectionRef>>,
    /// Conflicts involving at least one searched section. `None` only when a
    /// limit stopped the search before it completed any option.
    pub conflicts: Option<u32>,
    /// Conflicts between fixed items (locked sections and activities), never
    /// within one item. Reported separately and never part of `conflicts`.
    pub fixed_conflicts: u32,
    pub termination: Termination,
    pub statistics: SearchStatistics,
}

impl ScheduleResult {
    /// `conflicts` plus `fixed_conflicts`.
    pub fn total_conflicts(&self) -> Option<u32> {
        self.conflicts.map(|c| c + self.fixed_conflicts)
    }

    pub fn has_too_many_options(&self) -> bool {
        self.options.len() > TOO_MANY_OPTIONS
    }

    pub fn is_truncated(&self) -> bool {
        self.termination != Termination::Exhausted
    }
}

/// Find the best schedules for `classes` around `activities`.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyClassGroup`] if an unlocked group has no
/// sections.
pub fn schedule_slots(
    classes: &[Class],
    activities: &[NonClassActivity],
) -> Result<ScheduleResult, ScheduleError> {
    schedule_slots_with_limits(classes, activities, &SearchLimits::default())
}

/// [`schedule_slots`] with caps on the search.
pub fn schedule_slots_with_limits(
    classes: &[Class],
    activities: &[NonClassActivity],
    limits: &SearchLimits,
) -> Result<ScheduleResult, ScheduleError> {
    schedule_classes(classes, activities, limits)
}

fn schedule_classes<'c, I>(
    classes: I,
    activities: &[NonClassActivity],
    limits: &SearchLimits,
) -> Result<ScheduleResult, ScheduleError>
where
    I: IntoIterator<Item = &'c Class>,
{
    let mut fixed: Vec<Timeslot> = Vec::new();
    let mut fixed_sources: Vec<&[Timeslot]> = Vec::new();
    let mut free_groups = Vec::new();
    let mut free_sections: Vec<&[Section]> = Vec::new();
    let mut class_numbers: Vec<&str> = Vec::new();

    for (class_index, class) in classes.into_iter().enumerate() {
        class_numbers.push(&class.number);
        for (group_index, group) in class.groups.iter().enumerate() {
            if group.is_locked() {
                if let Some(section) = group.selected_section() {
                    fixed.extend_from_slice(&section.timeslots);
                    fixed_sources.push(&section.timeslots);
                }
            } else {
                free_groups.push(GroupRef {
                    class: class_index,
                    group: group_index,
                });
                free_sections.push(&group.sections);
            }
        }
    }
    for activity in activities {
        fixed.extend_from_slice(&activity.timeslots);
        fixed_sources.push(&activity.timeslots);
    }

    debug!(
        "scheduling {} free groups around {} fixed timeslots",
        free_groups.len(),
        fixed.len()
    );

    let outcome = find_best_assignments(&free_sections, &fixed, limits).map_err(|err| match err {
        ScheduleError::EmptySectionGroup { group } => ScheduleError::EmptyClassGroup {
            class: class_numbers[free_groups[group].class].to_owned(),
            group: free_groups[group].group,
        },
        other => other,
    })?;

    let conflicts = outcome.min_conflicts();
    let termination = outcome.termination();
    let statistics = outcome.statistics().clone();
    let options = outcome
        .into_options()
        .into_iter()
        .map(|assignment| {
            free_groups
                .iter()
                .zip(assignment)
                .map(|(at, section)| SectionRef {
                    class: at.class,
                    group: at.group,
                    section,
                })
                .collect()
        })
        .collect();

    Ok(ScheduleResult {
        free_groups,
        options,
        conflicts,
        fixed_conflicts: count_conflicts_across(&fixed_sources),
        termination,
        statistics,
    })
}

/// Write option `index` of `result` into the groups of `classes` and return
/// the index actually used. A missing or out-of-range index falls back to 0.
///
/// `result` must come from scheduling these same `classes`.
///
/// # Errors
///
/// Returns [`ScheduleError::UnknownGroup`] or
/// [`ScheduleError::SectionIndexOutOfRange`] if `result` refers to groups or
/// sections `classes` does not have.
pub fn select_option(
    classes: &mut [Class],
    result: &ScheduleResult,
    index: Option<usize>,
) -> Result<usize, ScheduleError> {
    let index = index.filter(|&i| i < result.options.len()).unwrap_or(0);
    let Some(option) = result.options.get(index) else {
        return Ok(0);
    };
    for choice in option {
        group_mut(classes, choice.class, choice.group)?.set_selected(choice.section)?;
    }
    Ok(index)
}

/// Whether adding `candidate` to `classes` keeps the conflict count as it is.
///
/// A class that is already selected never fits, and neither does one with an
/// unlocked group that has no sections. A class without section groups, or
/// an empty selection, always fits.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptyClassGroup`] if one of the selected
/// `classes` has an unlocked group with no sections.
pub fn fits_schedule(
    classes: &[Class],
    activities: &[NonClassActivity],
    candidate: &Class,
) -> Result<bool, ScheduleError> {
    if classes.iter().any(|class| class.number == candidate.number) {
        return Ok(false);
    }
    if candidate
        .groups
        .iter()
        .any(|group| !group.is_locked() && group.sections.is_empty())
    {
        return Ok(false);
    }
    if candidate.groups.is_empty() || classes.is_empty() {
        return Ok(true);
    }

    let limits = SearchLimits::default();
    let current = schedule_classes(classes, activities, &limits)?;
    let extended = schedule_classes(classes.iter().chain(iter::once(candidate)), activities, &limits)?;
    Ok(extended.conflicts == current.conflicts)
}

fn group_mut(
    classes: &mut [Class],
    class: usize,
    group: usize,
) -> Result<&mut SectionGroup, ScheduleError> {
    classes
        .get_mut(class)
        .and_then(|c| c.groups.get_mut(group))
        .ok_or(ScheduleError::UnknownGroup { class, group })
}
