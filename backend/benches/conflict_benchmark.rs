use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use flexwise_scheduler::algorithms::{detect_conflicts, group_by_slot};
use flexwise_scheduler::models::{
    Period, ReferenceData, Room, ScheduleEntry, SchoolClass, Teacher,
};
use flexwise_scheduler::store::{apply_filters, FilterSelection};

const DAYS: i64 = 5;
const PERIODS: usize = 8;

fn references(teachers: usize, rooms: usize, classes: usize) -> ReferenceData {
    ReferenceData::new()
        .with_teachers(
            (0..teachers)
                .map(|i| Teacher {
                    id: format!("t{}", i).into(),
                    name: format!("Teacher {}", i),
                    hours_account: Some(24),
                    age_reduction: None,
                })
                .collect(),
        )
        .with_rooms(
            (0..rooms)
                .map(|i| Room {
                    id: format!("r{}", i).into(),
                    name: format!("Room {}", i),
                    is_active: i % 17 != 0,
                    assigned_class_id: None,
                })
                .collect(),
        )
        .with_classes(
            (0..classes)
                .map(|i| SchoolClass {
                    id: format!("c{}", i).into(),
                    name: format!("{}{}", 5 + i / 4, ['a', 'b', 'c', 'd'][i % 4]),
                })
                .collect(),
        )
        .with_periods(
            (0..PERIODS)
                .map(|i| Period {
                    id: format!("p{}", i).into(),
                    block_number: i as i32 + 1,
                    label: format!("Block {}", i + 1),
                    time: String::new(),
                    is_instructional: true,
                })
                .collect(),
        )
}

/// A full week for `classes` classes with a handful of clashes mixed in.
fn week(classes: usize, teachers: usize, rooms: usize) -> Vec<ScheduleEntry> {
    let mut entries = Vec::with_capacity(classes * DAYS as usize * PERIODS);
    for class in 0..classes {
        for day in 1..=DAYS {
            for period in 0..PERIODS {
                let n = class * 31 + day as usize * 7 + period;
                entries.push(
                    ScheduleEntry::period_slot(day, format!("p{}", period))
                        .with_id(format!("l{}-{}-{}", class, day, period))
                        .with_class(format!("c{}", class))
                        .with_teachers([format!("t{}", n % teachers)])
                        .with_room(format!("r{}", n % rooms))
                        .with_course(format!("course{}", n % 12)),
                );
            }
        }
    }
    entries
}

fn bench_detect_conflicts(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_conflicts");

    for classes in [4usize, 16, 48] {
        let refs = references(classes * 2, classes + 4, classes);
        let entries = week(classes, classes * 2, classes + 4);
        group.bench_with_input(
            BenchmarkId::new("week", entries.len()),
            &entries,
            |b, entries| {
                b.iter(|| detect_conflicts(black_box(entries), black_box(&refs)));
            },
        );
    }

    group.finish();
}

fn bench_group_by_slot(c: &mut Criterion) {
    let entries = week(16, 32, 20);
    c.bench_function("group_by_slot", |b| {
        b.iter(|| group_by_slot(black_box(&entries)));
    });
}

fn bench_filters(c: &mut Criterion) {
    let entries = week(48, 96, 52);
    let selection = FilterSelection {
        teacher_ids: vec!["t3".into(), "t7".into()],
        class_id: None,
        room_id: Some("r5".into()),
    };
    c.bench_function("apply_filters", |b| {
        b.iter(|| apply_filters(black_box(&entries), black_box(&selection)).len());
    });
}

criterion_group!(
    benches,
    bench_detect_conflicts,
    bench_group_by_slot,
    bench_filters
);
criterion_main!(benches);
