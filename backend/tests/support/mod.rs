//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use flexwise_scheduler::models::{
    Course, CourseId, Period, PeriodId, ReferenceData, Room, ScheduleEntry, SchoolClass, SlotKey,
    Teacher,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on unwind, and callers are serialized because the
/// environment is process-global.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Fixtures ====================

pub fn periods() -> Vec<Period> {
    [
        ("p1", "1st block", "08:00-08:45"),
        ("p2", "2nd block", "08:50-09:35"),
        ("p3", "3rd block", "09:55-10:40"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (id, label, time))| Period {
        id: PeriodId::from(*id),
        block_number: i as i32 + 1,
        label: label.to_string(),
        time: time.to_string(),
        is_instructional: true,
    })
    .collect()
}

pub fn teacher(id: &str, name: &str, hours_account: Option<u32>) -> Teacher {
    Teacher {
        id: id.into(),
        name: name.to_string(),
        hours_account,
        age_reduction: None,
    }
}

pub fn room(id: &str, name: &str, is_active: bool, assigned_class_id: Option<&str>) -> Room {
    Room {
        id: id.into(),
        name: name.to_string(),
        is_active,
        assigned_class_id: assigned_class_id.map(Into::into),
    }
}

pub fn class(id: &str, name: &str) -> SchoolClass {
    SchoolClass {
        id: id.into(),
        name: name.to_string(),
    }
}

pub fn course(id: &str, slots: Vec<SlotKey>) -> Course {
    Course {
        id: CourseId::from(id),
        name: id.to_string(),
        code: None,
        capacity: None,
        subject: None,
        year_groups: Vec::new(),
        possible_slots: slots,
    }
}

/// Teachers t1..t3, rooms r1..r3 (r3 inactive), classes c1..c3.
pub fn references() -> ReferenceData {
    ReferenceData::new()
        .with_teachers(vec![
            teacher("t1", "Ada Lovelace", Some(20)),
            teacher("t2", "Carl Gauss", Some(2)),
            teacher("t3", "Emmy Noether", None),
        ])
        .with_rooms(vec![
            room("r1", "Lab 1", true, None),
            room("r2", "Room 2A", true, Some("c2")),
            room("r3", "Old Gym", false, None),
        ])
        .with_classes(vec![class("c1", "5a"), class("c2", "6b"), class("c3", "7c")])
        .with_periods(periods())
}

/// A lesson with every required field set.
pub fn lesson(
    day: i64,
    period: &str,
    teacher: &str,
    class: &str,
    room: &str,
    course: &str,
) -> ScheduleEntry {
    ScheduleEntry::period_slot(day, period)
        .with_teachers([teacher])
        .with_class(class)
        .with_room(room)
        .with_course(course)
}
