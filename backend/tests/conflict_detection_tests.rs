//! Conflict detection over realistic drafts.

mod support;

use std::collections::HashSet;

use flexwise_scheduler::algorithms::{
    detect_conflicts, get_available_courses_for_slot, get_conflicts_for_lesson,
    has_blocking_conflicts, ConflictSummary,
};
use flexwise_scheduler::models::{
    ConflictDetails, ConflictId, ConflictType, CourseId, DayId, PeriodId, ReferenceData,
    ScheduleEntry, Severity, SlotKey,
};
use flexwise_scheduler::parsing::parse_snapshot_str;
use support::{course, lesson, references};

#[test]
fn test_teacher_double_booking_lists_both_courses() {
    let entries = vec![
        lesson(1, "p1", "t1", "c1", "r1", "math"),
        lesson(1, "p1", "t1", "c3", "r2", "physics"),
    ];
    let conflicts = detect_conflicts(&entries, &ReferenceData::default());

    assert_eq!(conflicts.len(), 1);
    let conflict = &conflicts[0];
    assert_eq!(conflict.conflict_type, ConflictType::TeacherDoubleBooking);
    assert_eq!(conflict.severity, Severity::Error);
    assert_eq!(conflict.resource_ids, vec!["t1".to_string()]);
    assert_eq!(
        conflict.course_ids,
        vec![CourseId::from("math"), CourseId::from("physics")]
    );
    assert_eq!(conflict.slot_key(), Some(SlotKey::new(1, "p1")));
}

#[test]
fn test_clean_slot_has_no_conflicts() {
    let entries = vec![
        lesson(1, "p1", "t1", "c1", "r1", "math"),
        lesson(1, "p1", "t3", "c3", "r3b", "art"),
    ];
    let refs = ReferenceData::default();
    assert!(detect_conflicts(&entries, &refs).is_empty());
}

#[test]
fn test_overload_against_hours_account() {
    let refs = references();
    let entries = vec![
        lesson(1, "p1", "t2", "c1", "r1", "math"),
        lesson(2, "p2", "t2", "c1", "r1", "math"),
        lesson(3, "p3", "t2", "c1", "r1", "math"),
    ];
    let conflicts = detect_conflicts(&entries, &refs);

    let overloads: Vec<_> = conflicts
        .iter()
        .filter(|c| c.conflict_type == ConflictType::TeacherOverload)
        .collect();
    assert_eq!(overloads.len(), 1);
    assert_eq!(overloads[0].severity, Severity::Warning);
    assert_eq!(
        overloads[0].details,
        ConflictDetails::Overload {
            assigned: 3,
            limit: 2
        }
    );
    assert!(overloads[0].message.contains("Carl Gauss"));
}

#[test]
fn test_teacher_without_contingent_is_never_overloaded() {
    let refs = references();
    let entries: Vec<ScheduleEntry> = (1..=5)
        .map(|day| lesson(day, "p1", "t3", "c1", "r1", "math"))
        .collect();
    assert!(detect_conflicts(&entries, &refs).is_empty());
}

#[test]
fn test_ids_are_stable_across_instances() {
    let refs = references();
    let build = || {
        vec![
            lesson(1, "p1", "t1", "c1", "r1", "math"),
            lesson(1, "p1", "t1", "c2", "r1", "bio"),
            lesson(2, "p2", "t2", "c1", "r3", "art"),
            ScheduleEntry::period_slot(3, "p1").with_class("c1"),
        ]
    };
    let first: HashSet<ConflictId> = detect_conflicts(&build(), &refs)
        .into_iter()
        .map(|c| c.id)
        .collect();
    let mut reversed = build();
    reversed.reverse();
    let second: HashSet<ConflictId> = detect_conflicts(&reversed, &refs)
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_conflicts_follow_schedule_order() {
    let refs = references();
    let entries = vec![
        lesson(2, "p1", "t1", "c1", "r1", "a"),
        lesson(2, "p1", "t1", "c2", "r2", "b"),
        lesson(1, "p3", "t1", "c1", "r1", "c"),
        lesson(1, "p3", "t1", "c3", "r3", "d"),
        lesson(1, "p1", "t1", "c1", "r1", "e"),
        lesson(1, "p1", "t1", "c3", "r1", "f"),
    ];
    let conflicts = detect_conflicts(&entries, &refs);

    let mut previous: Option<(DayId, i32)> = None;
    for conflict in &conflicts {
        let day = conflict.day_id.unwrap();
        let block = refs
            .block_number_of(conflict.period_id.as_ref().unwrap())
            .unwrap();
        if let Some(prev) = previous {
            assert!(prev <= (day, block), "{:?} after {:?}", (day, block), prev);
        }
        previous = Some((day, block));
    }
}

#[test]
fn test_inactive_room_and_home_room_checks() {
    let refs = references();
    let entries = vec![
        lesson(1, "p1", "t1", "c1", "r3", "pe").with_id("gym"),
        lesson(1, "p2", "t1", "c1", "r2", "math").with_id("guest"),
        lesson(1, "p3", "t1", "c2", "r2", "math").with_id("home"),
    ];
    let conflicts = detect_conflicts(&entries, &refs);

    let gym = get_conflicts_for_lesson("gym", &conflicts);
    assert_eq!(gym.len(), 1);
    assert_eq!(gym[0].conflict_type, ConflictType::InactiveRoom);
    assert_eq!(gym[0].severity, Severity::Error);

    let guest = get_conflicts_for_lesson("guest", &conflicts);
    assert_eq!(guest.len(), 1);
    assert_eq!(guest[0].conflict_type, ConflictType::ClassWrongRoom);
    assert_eq!(
        guest[0].details,
        ConflictDetails::WrongRoom {
            entry_class: "5a".to_string(),
            room_class: "6b".to_string(),
        }
    );

    assert!(get_conflicts_for_lesson("home", &conflicts).is_empty());
}

#[test]
fn test_missing_data_lists_fields() {
    let entries = vec![ScheduleEntry::period_slot(1, "p1").with_class("c1").with_id("bare")];
    let conflicts = detect_conflicts(&entries, &ReferenceData::default());
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].conflict_type, ConflictType::MissingData);
    assert_eq!(
        conflicts[0].details,
        ConflictDetails::MissingFields {
            fields: vec!["teacher".to_string(), "course".to_string(), "room".to_string()]
        }
    );
}

#[test]
fn test_ignoring_every_error_unblocks_publish() {
    let entries = vec![
        lesson(1, "p1", "t1", "c1", "r1", "math"),
        lesson(1, "p1", "t2", "c2", "r1", "bio"),
    ];
    let conflicts = detect_conflicts(&entries, &references());
    assert!(has_blocking_conflicts(&conflicts, &HashSet::new()));

    let summary = ConflictSummary::from_conflicts(&conflicts);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.auto_resolvable, 1);
    assert_eq!(summary.by_type.get(&ConflictType::RoomDoubleBooking), Some(&1));

    let ignored: HashSet<ConflictId> = conflicts.iter().map(|c| c.id.clone()).collect();
    assert!(!has_blocking_conflicts(&conflicts, &ignored));
}

#[test]
fn test_malformed_slot_token_excludes_course() {
    let json = r#"{
        "courses": [
            {"id": "math", "name": "Math", "possible_slots": ["2|abc-uuid"]},
            {"id": "broken", "name": "Broken", "possible_slots": ["bad"]},
            {"id": "free", "name": "Free"}
        ]
    }"#;
    let snapshot = parse_snapshot_str(json).unwrap();
    assert_eq!(snapshot.courses[0].possible_slots, vec![SlotKey::new(2, "abc-uuid")]);

    let available =
        get_available_courses_for_slot(DayId(2), &PeriodId::from("abc-uuid"), &snapshot.courses);
    let ids: Vec<&str> = available.iter().map(|c| c.id.value()).collect();
    assert_eq!(ids, vec!["math", "free"]);

    let fixture = vec![course("any", vec![])];
    assert_eq!(
        get_available_courses_for_slot(DayId(9), &PeriodId::from("zz"), &fixture).len(),
        1
    );
}

#[test]
fn test_snapshot_with_alternate_field_names() {
    let json = r#"{
        "periods": [{"id": "p1", "order": 1, "name": "1st"}],
        "teachers": [{"id": "t1", "full_name": "Ada Lovelace", "total_hours": 1}],
        "rooms": [{"id": "r1", "name": "Lab", "active": false}],
        "entries": [
            {"day_id": 1, "period_id": "p1", "teacher_ids": ["t1"], "class_id": "c1",
             "subject_id": "math", "room_id": "r1"},
            {"day_id": 2, "period_id": "p1", "teacher_id": "t1", "class_id": "c1",
             "course_id": "math", "room_id": "r1"}
        ]
    }"#;
    let snapshot = parse_snapshot_str(json).unwrap();
    let conflicts = detect_conflicts(&snapshot.entries, &snapshot.references);

    let types: HashSet<ConflictType> = conflicts.iter().map(|c| c.conflict_type).collect();
    assert!(types.contains(&ConflictType::InactiveRoom));
    assert!(types.contains(&ConflictType::TeacherOverload));
    assert!(!types.contains(&ConflictType::MissingData));
}

#[test]
fn test_period_less_adhoc_lessons_in_inactive_room_stay_apart() {
    let adhoc = |id: &str, day: i64, start: &str, end: &str| {
        ScheduleEntry::adhoc(day, None, start, end)
            .with_id(id)
            .with_teachers(["t1"])
            .with_class("c1")
            .with_room("r3")
            .with_course("math")
    };
    let entries = vec![
        adhoc("a", 1, "09:00", "09:30"),
        adhoc("b", 2, "10:00", "10:30"),
    ];
    let conflicts = detect_conflicts(&entries, &references());

    let inactive: Vec<_> = conflicts
        .iter()
        .filter(|c| c.conflict_type == ConflictType::InactiveRoom)
        .collect();
    assert_eq!(inactive.len(), 2);
    let days: HashSet<Option<DayId>> = inactive.iter().map(|c| c.day_id).collect();
    assert_eq!(days, HashSet::from([Some(DayId(1)), Some(DayId(2))]));
    assert!(inactive.iter().all(|c| !c.id.value().ends_with(":*")));
}
