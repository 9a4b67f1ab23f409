use chrono::{Duration, TimeZone, Utc};
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use meetup_engine::{find_mutual_free_slots, AvailabilityConfig, BusyInterval};

/// A busy week: every other hour booked for one participant, half an hour
/// in every ninety minutes for the other.
fn dense_week() -> (Vec<BusyInterval>, Vec<BusyInterval>) {
    let base = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
    let mine = (0..7 * 12)
        .map(|i| {
            let start = base + Duration::hours(i * 2);
            BusyInterval::new(start, start + Duration::hours(1))
        })
        .collect();
    let theirs = (0..7 * 16)
        .map(|i| {
            let start = base + Duration::minutes(i * 90);
            BusyInterval::new(start, start + Duration::minutes(30))
        })
        .collect();
    (mine, theirs)
}

fn bench_mutual_slots(c: &mut Criterion) {
    let (mine, theirs) = dense_week();
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    let capped = AvailabilityConfig::default();
    let uncapped = AvailabilityConfig {
        max_slots: None,
        ..AvailabilityConfig::default()
    };

    c.bench_function("dense_week_capped", |b| {
        b.iter(|| find_mutual_free_slots(black_box(&mine), black_box(&theirs), 30, now, &capped))
    });
    c.bench_function("dense_week_uncapped", |b| {
        b.iter(|| find_mutual_free_slots(black_box(&mine), black_box(&theirs), 30, now, &uncapped))
    });
    let nobody: Vec<BusyInterval> = Vec::new();
    c.bench_function("empty_week", |b| {
        b.iter(|| find_mutual_free_slots(black_box(&nobody), black_box(&nobody), 60, now, &uncapped))
    });
}

criterion_group!(benches, bench_mutual_slots);
criterion_main!(benches);
