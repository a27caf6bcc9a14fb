//! Scheduling conflict detection.
//!
//! [`detect_conflicts`] is a pure function of the entries and the reference
//! data. It detects:
//! - teacher, room and class double-bookings among entries sharing a slot
//! - teachers assigned more lessons than their hours account
//! - lessons placed in inactive rooms
//! - lessons missing a teacher, class, course, room or slot
//! - classes placed in another class's home room
//!
//! Conflict ids are derived from `(type, resource, slot)`, so running the
//! detector twice over equal input yields equal ids.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{
    Conflict, ConflictDetails, ConflictId, ConflictType, CourseId, DayId, PeriodId, ReferenceData,
    ScheduleEntry, ScheduleType, Severity, SlotKey, TeacherId,
};

/// Detect all conflicts in `entries`, sorted in schedule order.
pub fn detect_conflicts(entries: &[ScheduleEntry], refs: &ReferenceData) -> Vec<Conflict> {
    let mut found = ConflictSet::default();

    let slots = group_by_slot(entries);
    for (slot, group) in &slots {
        if group.len() < 2 {
            continue;
        }
        detect_teacher_double_bookings(slot, group, refs, &mut found);
        detect_room_double_bookings(slot, group, refs, &mut found);
        detect_class_double_bookings(slot, group, refs, &mut found);
    }

    detect_teacher_overload(entries, refs, &mut found);

    for entry in entries {
        detect_inactive_room(entry, refs, &mut found);
        detect_missing_data(entry, refs, &mut found);
        detect_class_wrong_room(entry, refs, &mut found);
    }

    let mut conflicts = found.into_vec();
    sort_conflicts(&mut conflicts, refs);

    log::debug!(
        "Detected {} conflict(s) across {} entries in {} occupied slot(s)",
        conflicts.len(),
        entries.len(),
        slots.len()
    );
    conflicts
}

/// Group entries by `(day_id, period_id)`. Entries without a complete slot
/// are left out.
pub fn group_by_slot(entries: &[ScheduleEntry]) -> BTreeMap<SlotKey, Vec<&ScheduleEntry>> {
    let mut slots: BTreeMap<SlotKey, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        if let Some(slot) = entry.slot_key() {
            slots.entry(slot).or_default().push(entry);
        }
    }
    slots
}

/// Conflicts keyed by id. Re-reporting an id merges the affected lessons
/// into the existing record.
#[derive(Default)]
struct ConflictSet {
    by_id: BTreeMap<ConflictId, Conflict>,
}

impl ConflictSet {
    fn push(&mut self, conflict: Conflict) {
        match self.by_id.get_mut(&conflict.id) {
            Some(existing) => {
                extend_unique(&mut existing.lesson_refs, conflict.lesson_refs);
                extend_unique(&mut existing.course_ids, conflict.course_ids);
                extend_unique(&mut existing.resource_ids, conflict.resource_ids);
                if let (
                    ConflictDetails::MissingFields { fields },
                    ConflictDetails::MissingFields { fields: more },
                ) = (&mut existing.details, conflict.details)
                {
                    extend_unique(fields, more);
                }
            }
            None => {
                self.by_id.insert(conflict.id.clone(), conflict);
            }
        }
    }

    fn into_vec(self) -> Vec<Conflict> {
        self.by_id.into_values().collect()
    }
}

fn extend_unique<T: PartialEq>(target: &mut Vec<T>, items: Vec<T>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

fn course_ids_of<'a>(entries: impl IntoIterator<Item = &'a ScheduleEntry>) -> Vec<CourseId> {
    let mut ids: Vec<CourseId> = Vec::new();
    for entry in entries {
        if let Some(course) = entry.course_id.as_ref().filter(|c| !c.is_empty()) {
            if !ids.contains(course) {
                ids.push(course.clone());
            }
        }
    }
    ids
}

fn lesson_refs_of<'a>(entries: impl IntoIterator<Item = &'a ScheduleEntry>) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    for entry in entries {
        let lesson = entry.lesson_ref();
        if !refs.contains(&lesson) {
            refs.push(lesson);
        }
    }
    refs
}

fn slot_label(slot: &SlotKey, refs: &ReferenceData) -> String {
    let period = refs
        .period(&slot.period_id)
        .map(|p| p.label.clone())
        .unwrap_or_else(|| slot.period_id.to_string());
    format!("day {}, {}", slot.day_id, period)
}

fn entry_slot_label(entry: &ScheduleEntry, refs: &ReferenceData) -> String {
    match entry.slot_key() {
        Some(slot) => slot_label(&slot, refs),
        None => match (entry.day_id, entry.start_time.as_deref()) {
            (Some(day), Some(start)) => format!("day {}, {}", day, start),
            (Some(day), None) => format!("day {}", day),
            _ => "an unscheduled slot".to_string(),
        },
    }
}

fn slot_conflict(
    conflict_type: ConflictType,
    severity: Severity,
    resource: String,
    slot: &SlotKey,
    entries: &[&ScheduleEntry],
    message: String,
) -> Conflict {
    Conflict {
        id: Conflict::build_id(conflict_type, &resource, Some(slot)),
        conflict_type,
        severity,
        day_id: Some(slot.day_id),
        period_id: Some(slot.period_id.clone()),
        resource_ids: vec![resource],
        course_ids: course_ids_of(entries.iter().copied()),
        lesson_refs: lesson_refs_of(entries.iter().copied()),
        message,
        auto_resolvable: conflict_type.is_auto_resolvable(),
        details: ConflictDetails::None,
    }
}

fn entry_conflict(
    conflict_type: ConflictType,
    severity: Severity,
    resource: String,
    entry: &ScheduleEntry,
    message: String,
    details: ConflictDetails,
) -> Conflict {
    // Period-less ad-hoc lessons are located by day and times instead.
    let id = match entry.slot_key() {
        Some(slot) => Conflict::build_id(conflict_type, &resource, Some(&slot)),
        None => Conflict::build_id_at(conflict_type, &resource, entry.key()),
    };
    Conflict {
        id,
        conflict_type,
        severity,
        day_id: entry.day_id,
        period_id: entry.period_id.clone(),
        resource_ids: vec![resource],
        course_ids: course_ids_of([entry]),
        lesson_refs: vec![entry.lesson_ref()],
        message,
        auto_resolvable: conflict_type.is_auto_resolvable(),
        details,
    }
}

fn detect_teacher_double_bookings(
    slot: &SlotKey,
    group: &[&ScheduleEntry],
    refs: &ReferenceData,
    found: &mut ConflictSet,
) {
    let mut by_teacher: BTreeMap<&TeacherId, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in group {
        for teacher in entry.distinct_teachers() {
            by_teacher.entry(teacher).or_default().push(entry);
        }
    }

    for (teacher, booked) in by_teacher {
        if booked.len() < 2 {
            continue;
        }
        let message = format!(
            "{} is double-booked on {} ({} lessons)",
            refs.teacher_name(teacher),
            slot_label(slot, refs),
            booked.len()
        );
        found.push(slot_conflict(
            ConflictType::TeacherDoubleBooking,
            Severity::Error,
            teacher.to_string(),
            slot,
            &booked,
            message,
        ));
    }
}

fn detect_room_double_bookings(
    slot: &SlotKey,
    group: &[&ScheduleEntry],
    refs: &ReferenceData,
    found: &mut ConflictSet,
) {
    let mut by_room: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in group {
        if let Some(room) = entry.room_id.as_ref().filter(|r| !r.is_empty()) {
            by_room.entry(room.value()).or_default().push(entry);
        }
    }

    for (room, booked) in by_room {
        if booked.len() < 2 {
            continue;
        }
        let message = format!(
            "Room {} is double-booked on {} ({} lessons)",
            refs.room_name(&room.into()),
            slot_label(slot, refs),
            booked.len()
        );
        found.push(slot_conflict(
            ConflictType::RoomDoubleBooking,
            Severity::Error,
            room.to_string(),
            slot,
            &booked,
            message,
        ));
    }
}

fn detect_class_double_bookings(
    slot: &SlotKey,
    group: &[&ScheduleEntry],
    refs: &ReferenceData,
    found: &mut ConflictSet,
) {
    let mut by_class: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in group {
        if let Some(class) = entry.class_id.as_ref().filter(|c| !c.is_empty()) {
            by_class.entry(class.value()).or_default().push(entry);
        }
    }

    for (class, booked) in by_class {
        if booked.len() < 2 {
            continue;
        }
        let message = format!(
            "Class {} has {} lessons at the same time on {}",
            refs.class_name(&class.into()),
            booked.len(),
            slot_label(slot, refs)
        );
        found.push(slot_conflict(
            ConflictType::ClassDoubleBooking,
            Severity::Error,
            class.to_string(),
            slot,
            &booked,
            message,
        ));
    }
}

fn detect_teacher_overload(
    entries: &[ScheduleEntry],
    refs: &ReferenceData,
    found: &mut ConflictSet,
) {
    let mut assigned: BTreeMap<&TeacherId, Vec<&ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        for teacher in entry.distinct_teachers() {
            assigned.entry(teacher).or_default().push(entry);
        }
    }

    for (teacher_id, lessons) in assigned {
        let Some(teacher) = refs.teacher(teacher_id) else {
            continue;
        };
        let Some(limit) = teacher.hours_account else {
            continue;
        };
        let count = lessons.len() as u32;
        if count <= limit {
            continue;
        }

        found.push(Conflict {
            id: Conflict::build_id(ConflictType::TeacherOverload, teacher_id.value(), None),
            conflict_type: ConflictType::TeacherOverload,
            severity: Severity::Warning,
            day_id: None,
            period_id: None,
            resource_ids: vec![teacher_id.to_string()],
            course_ids: course_ids_of(lessons.iter().copied()),
            lesson_refs: lesson_refs_of(lessons.iter().copied()),
            message: format!(
                "{} is assigned {} lessons but the hours account allows {}",
                teacher.name, count, limit
            ),
            auto_resolvable: false,
            details: ConflictDetails::Overload {
                assigned: count,
                limit,
            },
        });
    }
}

fn detect_inactive_room(entry: &ScheduleEntry, refs: &ReferenceData, found: &mut ConflictSet) {
    let Some(room) = entry.room_id.as_ref().and_then(|id| refs.room(id)) else {
        return;
    };
    if room.is_active {
        return;
    }
    let message = format!(
        "Room {} is inactive but hosts a lesson on {}",
        room.name,
        entry_slot_label(entry, refs)
    );
    found.push(entry_conflict(
        ConflictType::InactiveRoom,
        Severity::Error,
        room.id.to_string(),
        entry,
        message,
        ConflictDetails::None,
    ));
}

/// Labels of required fields the entry lacks.
pub fn missing_fields(entry: &ScheduleEntry) -> Vec<String> {
    let mut missing = Vec::new();
    if entry.distinct_teachers().is_empty() {
        missing.push("teacher".to_string());
    }
    if entry.class_id.as_ref().filter(|c| !c.is_empty()).is_none() {
        missing.push("class".to_string());
    }
    if entry.course_id.as_ref().filter(|c| !c.is_empty()).is_none() {
        missing.push("course".to_string());
    }
    if entry.room_id.as_ref().filter(|r| !r.is_empty()).is_none() {
        missing.push("room".to_string());
    }

    let timed_adhoc = entry.schedule_type == ScheduleType::Adhoc && entry.has_explicit_times();
    let has_period = entry.period_id.as_ref().is_some_and(|p| !p.is_empty());
    if entry.day_id.is_none() || (!has_period && !timed_adhoc) {
        missing.push("slot".to_string());
    }
    missing
}

fn detect_missing_data(entry: &ScheduleEntry, refs: &ReferenceData, found: &mut ConflictSet) {
    let fields = missing_fields(entry);
    if fields.is_empty() {
        return;
    }
    let message = format!(
        "Lesson on {} is missing: {}",
        entry_slot_label(entry, refs),
        fields.join(", ")
    );
    found.push(entry_conflict(
        ConflictType::MissingData,
        Severity::Error,
        entry.lesson_ref(),
        entry,
        message,
        ConflictDetails::MissingFields { fields },
    ));
}

fn detect_class_wrong_room(entry: &ScheduleEntry, refs: &ReferenceData, found: &mut ConflictSet) {
    let Some(entry_class) = entry.class_id.as_ref().filter(|c| !c.is_empty()) else {
        return;
    };
    let Some(room) = entry.room_id.as_ref().and_then(|id| refs.room(id)) else {
        return;
    };
    let Some(room_class) = room.assigned_class_id.as_ref() else {
        return;
    };
    if room_class == entry_class {
        return;
    }

    let entry_class_name = refs.class_name(entry_class);
    let room_class_name = refs.class_name(room_class);
    let message = format!(
        "Class {} is scheduled in room {}, the home room of class {}",
        entry_class_name, room.name, room_class_name
    );
    found.push(entry_conflict(
        ConflictType::ClassWrongRoom,
        Severity::Warning,
        format!("{}@{}", entry_class, room.id),
        entry,
        message,
        ConflictDetails::WrongRoom {
            entry_class: entry_class_name,
            room_class: room_class_name,
        },
    ));
}

/// Schedule order: day, then period block number; conflicts without a slot
/// come last. Ties break on type and id.
fn sort_conflicts(conflicts: &mut [Conflict], refs: &ReferenceData) {
    conflicts.sort_by_cached_key(|c| {
        let block = c
            .period_id
            .as_ref()
            .and_then(|p| refs.block_number_of(p))
            .unwrap_or(i32::MAX);
        (
            c.day_id.is_none(),
            c.day_id,
            block,
            c.period_id.clone(),
            c.conflict_type,
            c.id.clone(),
        )
    });
}

// ==================== Conflict queries ====================

/// Conflicts attached to a lesson, by direct id or affected-lesson list.
pub fn get_conflicts_for_lesson<'a>(
    lesson_ref: &str,
    conflicts: &'a [Conflict],
) -> Vec<&'a Conflict> {
    conflicts
        .iter()
        .filter(|c| c.affects_lesson(lesson_ref))
        .collect()
}

pub fn get_conflicts_for_slot<'a>(
    day_id: DayId,
    period_id: &PeriodId,
    conflicts: &'a [Conflict],
) -> Vec<&'a Conflict> {
    conflicts
        .iter()
        .filter(|c| c.day_id == Some(day_id) && c.period_id.as_ref() == Some(period_id))
        .collect()
}

pub fn group_conflicts_by_type(conflicts: &[Conflict]) -> BTreeMap<ConflictType, Vec<&Conflict>> {
    let mut grouped: BTreeMap<ConflictType, Vec<&Conflict>> = BTreeMap::new();
    for conflict in conflicts {
        grouped.entry(conflict.conflict_type).or_default().push(conflict);
    }
    grouped
}

pub fn get_auto_resolvable_conflicts(conflicts: &[Conflict]) -> Vec<&Conflict> {
    conflicts.iter().filter(|c| c.auto_resolvable).collect()
}

/// True when any error-severity conflict is not in `ignored`. Gates publish.
pub fn has_blocking_conflicts(conflicts: &[Conflict], ignored: &HashSet<ConflictId>) -> bool {
    conflicts
        .iter()
        .any(|c| c.is_blocking() && !ignored.contains(&c.id))
}

/// Counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub auto_resolvable: usize,
    pub by_type: BTreeMap<ConflictType, usize>,
}

impl ConflictSummary {
    pub fn from_conflicts(conflicts: &[Conflict]) -> Self {
        let mut summary = Self {
            total: conflicts.len(),
            ..Default::default()
        };
        for conflict in conflicts {
            match conflict.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
            if conflict.auto_resolvable {
                summary.auto_resolvable += 1;
            }
            *summary.by_type.entry(conflict.conflict_type).or_insert(0) += 1;
        }
        summary
    }
}
