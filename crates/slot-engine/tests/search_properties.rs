//! Property tests: the branch-and-bound search against brute-force enumeration.

use proptest::prelude::*;
use slot_engine::{find_best_assignments, SearchLimits, Section, Slot, Timeslot};

/// Timeslots squeezed into the first two mornings so that overlaps are common.
fn timeslot() -> impl Strategy<Value = Timeslot> {
    (0u8..2, 0u8..8, 1u8..=3).prop_map(|(day, index, len)| {
        Timeslot::new(Slot::from_day_and_index(day, index).unwrap(), len).unwrap()
    })
}

fn section() -> impl Strategy<Value = Section> {
    prop::collection::vec(timeslot(), 0..=2).prop_map(|slots| Section::new("s", slots))
}

fn groups() -> impl Strategy<Value = Vec<Vec<Section>>> {
    prop::collection::vec(prop::collection::vec(section(), 1..=4), 0..=4)
}

fn fixed() -> impl Strategy<Value = Vec<Timeslot>> {
    prop::collection::vec(timeslot(), 0..=3)
}

fn pairs(a: &[Timeslot], b: &[Timeslot]) -> u32 {
    a.iter()
        .flat_map(|x| b.iter().filter(move |y| x.conflicts(y)))
        .count() as u32
}

fn cost(groups: &[Vec<Section>], fixed: &[Timeslot], assignment: &[usize]) -> u32 {
    let chosen: Vec<&Section> = groups
        .iter()
        .zip(assignment)
        .map(|(group, &i)| &group[i])
        .collect();
    let mut total = 0;
    for (i, a) in chosen.iter().enumerate() {
        total += pairs(&a.timeslots, fixed);
        for b in &chosen[i + 1..] {
            total += pairs(&a.timeslots, &b.timeslots);
        }
    }
    total
}

/// Every assignment in lexicographic order.
fn all_assignments(groups: &[Vec<Section>]) -> Vec<Vec<usize>> {
    let mut all = vec![Vec::new()];
    for group in groups {
        all = all
            .into_iter()
            .flat_map(|prefix: Vec<usize>| {
                (0..group.len()).map(move |i| {
                    let mut next = prefix.clone();
                    next.push(i);
                    next
                })
            })
            .collect();
    }
    all
}

fn brute_force(groups: &[Vec<Section>], fixed: &[Timeslot]) -> (u32, Vec<Vec<usize>>) {
    let scored: Vec<(u32, Vec<usize>)> = all_assignments(groups)
        .into_iter()
        .map(|a| (cost(groups, fixed, &a), a))
        .collect();
    let min = scored.iter().map(|(c, _)| *c).min().unwrap_or(0);
    let best = scored
        .into_iter()
        .filter(|(c, _)| *c == min)
        .map(|(_, a)| a)
        .collect();
    (min, best)
}

proptest! {
    #[test]
    fn prop_matches_brute_force(groups in groups(), fixed in fixed()) {
        let outcome = find_best_assignments(&groups, &fixed, &SearchLimits::default()).unwrap();
        let (min, best) = brute_force(&groups, &fixed);
        prop_assert_eq!(outcome.min_conflicts(), Some(min));
        prop_assert_eq!(outcome.options(), best.as_slice());
        prop_assert!(!outcome.is_truncated());
    }

    #[test]
    fn prop_every_option_has_the_minimum(groups in groups(), fixed in fixed()) {
        let outcome = find_best_assignments(&groups, &fixed, &SearchLimits::default()).unwrap();
        let min = outcome.min_conflicts().unwrap();
        for option in outcome.options() {
            prop_assert_eq!(option.len(), groups.len());
            prop_assert_eq!(cost(&groups, &fixed, option), min);
        }
    }

    #[test]
    fn prop_search_is_idempotent(groups in groups(), fixed in fixed()) {
        let first = find_best_assignments(&groups, &fixed, &SearchLimits::default()).unwrap();
        let second = find_best_assignments(&groups, &fixed, &SearchLimits::default()).unwrap();
        prop_assert_eq!(first.min_conflicts(), second.min_conflicts());
        prop_assert_eq!(first.options(), second.options());
    }

    #[test]
    fn prop_extra_fixed_span_never_lowers_minimum(
        groups in groups(),
        fixed in fixed(),
        extra in timeslot(),
    ) {
        let before = find_best_assignments(&groups, &fixed, &SearchLimits::default()).unwrap();
        let mut more = fixed.clone();
        more.push(extra);
        let after = find_best_assignments(&groups, &more, &SearchLimits::default()).unwrap();
        prop_assert!(after.min_conflicts() >= before.min_conflicts());
    }

    #[test]
    fn prop_truncated_search_never_beats_optimum(
        groups in groups(),
        fixed in fixed(),
        max_nodes in 0u64..20,
    ) {
        let limits = SearchLimits::default().with_max_nodes(max_nodes);
        let truncated = find_best_assignments(&groups, &fixed, &limits).unwrap();
        let (min, _) = brute_force(&groups, &fixed);
        if let Some(found) = truncated.min_conflicts() {
            prop_assert!(found >= min);
        }
        for option in truncated.options() {
            prop_assert_eq!(Some(cost(&groups, &fixed, option)), truncated.min_conflicts());
        }
    }

    #[test]
    fn prop_conflicts_is_symmetric(a in timeslot(), b in timeslot()) {
        prop_assert_eq!(a.conflicts(&b), b.conflicts(&a));
        prop_assert!(a.conflicts(&a));
    }
}
