//! Conflict-minimizing section assignment.
//!
//! Given an ordered list of free section groups and a set of already fixed
//! timeslots, [`find_best_assignments`] picks exactly one section from every
//! group so that the total number of overlapping timeslot pairs is as small
//! as possible, and returns *every* assignment that reaches that minimum.
//!
//! Conflicts are counted between sections chosen for different groups and
//! between a chosen section and a fixed timeslot, always with multiplicity.
//! Overlaps among the fixed timeslots themselves, and among the timeslots of
//! a single section, are never counted here.
//!
//! # Algorithm
//!
//! Depth-first branch and bound over the groups in input order, trying the
//! sections of each group in their given order. A candidate is skipped as
//! soon as the conflicts accumulated along its path exceed the best complete
//! assignment found so far. The cutoff is strict, so assignments that tie
//! the best are still reached and every optimal assignment is reported.
//!
//! All search state belongs to a single call: one stack of committed
//! timeslots that is truncated on backtrack, the partial assignment, and one
//! buffer of options that is cleared whenever a strictly better assignment
//! turns up. Options are stored as section indices, one per group.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use crate::error::ScheduleError;
use crate::section::Section;
use crate::timeslot::Timeslot;

/// One section index per free group, in group order.
pub type Assignment = Vec<usize>;

/// How often, in explored nodes, the wall clock is consulted.
const TIME_CHECK_INTERVAL: u64 = 256;

/// Caps on how much work a single search may do.
///
/// The default is unbounded. When a cap is hit the search stops early and
/// the outcome is marked as truncated; see [`SearchOutcome::is_truncated`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of section placements to explore.
    pub max_nodes: Option<u64>,
    /// Maximum wall-clock time to spend.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The whole tree was explored; the result is optimal and complete.
    Exhausted,
    /// [`SearchLimits::max_nodes`] was reached.
    NodeLimit,
    /// [`SearchLimits::time_limit`] was reached.
    TimeLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exhausted => write!(f, "search space exhausted"),
            Termination::NodeLimit => write!(f, "node limit reached"),
            Termination::TimeLimit => write!(f, "time limit reached"),
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStatistics {
    /// Section placements that passed the bound check.
    pub nodes_explored: u64,
    /// Candidates skipped because they could not tie the best assignment.
    pub prunings_bound: u64,
    /// Complete assignments reached.
    pub leaves: u64,
    /// Deepest level reached, in groups.
    pub max_depth: u64,
    pub elapsed: Duration,
}

impl SearchStatistics {
    #[inline]
    fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    fn on_leaf(&mut self) {
        self.leaves = self.leaves.saturating_add(1);
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} pruned, {} leaves, depth {}, {:.3}s",
            self.nodes_explored,
            self.prunings_bound,
            self.leaves,
            self.max_depth,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Result of [`find_best_assignments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    min_conflicts: Option<u32>,
    options: Vec<Assignment>,
    termination: Termination,
    statistics: SearchStatistics,
}

impl SearchOutcome {
    /// The smallest conflict count found. Always `Some` for a search that
    /// ran to completion; `None` only if a limit stopped the search before
    /// any complete assignment was reached.
    #[inline]
    pub fn min_conflicts(&self) -> Option<u32> {
        self.min_conflicts
    }

    /// Every assignment found with [`SearchOutcome::min_conflicts`]
    /// conflicts, in depth-first order.
    #[inline]
    pub fn options(&self) -> &[Assignment] {
        &self.options
    }

    #[inline]
    pub fn into_options(self) -> Vec<Assignment> {
        self.options
    }

    #[inline]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Whether a limit cut the search short. A truncated outcome may be
    /// suboptimal and may be missing tied options.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.termination != Termination::Exhausted
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }
}

/// Find every assignment of one section per group that minimizes conflicts.
///
/// # Arguments
///
/// * `groups` - the free groups, in the order they are branched on. Order
///   only affects the order of the returned options, never the minimum.
/// * `fixed` - timeslots committed before the search: locked sections and
///   non-class activities.
/// * `limits` - optional caps on the work done.
///
/// # Errors
///
/// Returns [`ScheduleError::EmptySectionGroup`] if any group has no
/// sections, since no assignment could ever be completed.
///
/// # Examples
///
/// ```
/// use slot_engine::{find_best_assignments, SearchLimits, Section, Slot, Timeslot};
///
/// let at = |start, len| Timeslot::new(Slot::new(start).unwrap(), len).unwrap();
/// let lecture = vec![Section::new("A1", vec![at(10, 2)]), Section::new("A2", vec![at(40, 2)])];
/// let recitation = vec![Section::new("B1", vec![at(10, 2)])];
///
/// let outcome =
///     find_best_assignments(&[lecture, recitation], &[], &SearchLimits::default()).unwrap();
/// assert_eq!(outcome.min_conflicts(), Some(0));
/// assert_eq!(outcome.options(), &[vec![1, 0]]);
/// ```
pub fn find_best_assignments<G>(
    groups: &[G],
    fixed: &[Timeslot],
    limits: &SearchLimits,
) -> Result<SearchOutcome, ScheduleError>
where
    G: AsRef<[Section]>,
{
    if let Some(group) = groups.iter().position(|g| g.as_ref().is_empty()) {
        return Err(ScheduleError::EmptySectionGroup { group });
    }

    let mut searcher = Searcher::new(groups, fixed, limits);
    searcher.descend(0, 0);
    let outcome = searcher.finish();

    debug!(
        "search over {} groups with {} fixed timeslots: {} options at {:?} conflicts ({})",
        groups.len(),
        fixed.len(),
        outcome.options.len(),
        outcome.min_conflicts,
        outcome.statistics
    );
    if outcome.is_truncated() {
        warn!(
            "search stopped early ({}); best found has {:?} conflicts and may not be optimal",
            outcome.termination, outcome.min_conflicts
        );
    }

    Ok(outcome)
}

struct Searcher<'a, G> {
    groups: &'a [G],
    limits: &'a SearchLimits,
    started: Instant,
    /// Fixed timeslots followed by those of every section on the current path.
    committed: Vec<Timeslot>,
    partial: Assignment,
    best: Option<u32>,
    options: Vec<Assignment>,
    stopped: Option<Termination>,
    statistics: SearchStatistics,
}

impl<'a, G> Searcher<'a, G>
where
    G: AsRef<[Section]>,
{
    fn new(groups: &'a [G], fixed: &[Timeslot], limits: &'a SearchLimits) -> Self {
        Searcher {
            groups,
            limits,
            started: Instant::now(),
            committed: fixed.to_vec(),
            partial: Vec::with_capacity(groups.len()),
            best: None,
            options: Vec::new(),
            stopped: None,
            statistics: SearchStatistics::default(),
        }
    }

    fn descend(&mut self, depth: usize, conflicts: u32) {
        let groups = self.groups;
        let Some(group) = groups.get(depth) else {
            self.record_leaf(conflicts);
            return;
        };

        for (index, section) in group.as_ref().iter().enumerate() {
            let total = conflicts + section.count_conflicts(&self.committed);
            if self.best.is_some_and(|best| total > best) {
                self.statistics.on_pruning_bound();
                continue;
            }
            if self.out_of_budget() {
                return;
            }
            self.statistics.on_node_explored(depth + 1);

            let mark = self.committed.len();
            self.committed.extend_from_slice(&section.timeslots);
            self.partial.push(index);

            self.descend(depth + 1, total);

            self.partial.pop();
            self.committed.truncate(mark);

            if self.stopped.is_some() {
                return;
            }
        }
    }

    fn record_leaf(&mut self, conflicts: u32) {
        self.statistics.on_leaf();
        match self.best {
            Some(best) if conflicts > best => return,
            Some(best) if conflicts == best => {}
            _ => {
                self.options.clear();
                self.best = Some(conflicts);
            }
        }
        self.options.push(self.partial.clone());
    }

    fn out_of_budget(&mut self) -> bool {
        let explored = self.statistics.nodes_explored;
        if self.limits.max_nodes.is_some_and(|max| explored >= max) {
            self.stopped = Some(Termination::NodeLimit);
        } else if let Some(limit) = self.limits.time_limit {
            if explored % TIME_CHECK_INTERVAL == 0 && self.started.elapsed() >= limit {
                self.stopped = Some(Termination::TimeLimit);
            }
        }
        self.stopped.is_some()
    }

    fn finish(mut self) -> SearchOutcome {
        self.statistics.elapsed = self.started.elapsed();
        SearchOutcome {
            min_conflicts: self.best,
            options: self.options,
            termination: self.stopped.unwrap_or(Termination::Exhausted),
            statistics: self.statistics,
        }
    }
}
