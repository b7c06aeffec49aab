use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{find_best_assignments, SearchLimits, Section, Slot, Timeslot};

/// `groups` groups of `per_group` sections, each meeting twice a week for an
/// hour at staggered times so that many combinations overlap.
fn crowded_week(groups: u8, per_group: u8) -> Vec<Vec<Section>> {
    (0..groups)
        .map(|g| {
            (0..per_group)
                .map(|s| {
                    let index = (2 * g + 3 * s) % 20;
                    let meetings = [s % 5, (s + 2) % 5]
                        .into_iter()
                        .map(|day| {
                            let start = Slot::from_day_and_index(day, index).unwrap();
                            Timeslot::new(start, 2).unwrap()
                        })
                        .collect();
                    Section::new(format!("{g}-{s}"), meetings)
                })
                .collect()
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let limits = SearchLimits::default();

    let small = crowded_week(4, 4);
    c.bench_function("search_4x4", |b| {
        b.iter(|| find_best_assignments(black_box(&small), &[], &limits).unwrap())
    });

    let medium = crowded_week(7, 5);
    let gym: Vec<Timeslot> = (0..5)
        .map(|day| Timeslot::new(Slot::from_day_and_index(day, 18).unwrap(), 4).unwrap())
        .collect();
    c.bench_function("search_7x5_with_fixed", |b| {
        b.iter(|| find_best_assignments(black_box(&medium), black_box(&gym), &limits).unwrap())
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
