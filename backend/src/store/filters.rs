//! Filter predicates over schedule entries.
//!
//! Each dimension is skipped when its selection is empty; dimensions compose
//! with AND semantics.

use serde::{Deserialize, Serialize};

use crate::models::{ClassId, RoomId, ScheduleEntry, ScheduleType, TeacherId};

/// Current filter selections of the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Ordered, no duplicates.
    pub teacher_ids: Vec<TeacherId>,
    pub class_id: Option<ClassId>,
    pub room_id: Option<RoomId>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.teacher_ids.is_empty() && self.class_id.is_none() && self.room_id.is_none()
    }

    /// Add the teacher if absent, remove it if present.
    pub fn toggle_teacher(&mut self, teacher_id: TeacherId) {
        if let Some(pos) = self.teacher_ids.iter().position(|t| t == &teacher_id) {
            self.teacher_ids.remove(pos);
        } else {
            self.teacher_ids.push(teacher_id);
        }
    }

    pub fn clear(&mut self) {
        self.teacher_ids.clear();
        self.class_id = None;
        self.room_id = None;
    }

    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        matches_teachers(entry, &self.teacher_ids)
            && matches_class(entry, self.class_id.as_ref())
            && matches_room(entry, self.room_id.as_ref())
    }
}

/// Keep the entry when it shares at least one teacher with `selected`.
pub fn matches_teachers(entry: &ScheduleEntry, selected: &[TeacherId]) -> bool {
    selected.is_empty() || selected.iter().any(|t| entry.has_teacher(t))
}

pub fn matches_class(entry: &ScheduleEntry, selected: Option<&ClassId>) -> bool {
    match selected {
        None => true,
        Some(class_id) => entry.class_id.as_ref() == Some(class_id),
    }
}

pub fn matches_room(entry: &ScheduleEntry, selected: Option<&RoomId>) -> bool {
    match selected {
        None => true,
        Some(room_id) => entry.room_id.as_ref() == Some(room_id),
    }
}

/// Apply teacher, class and room filters in sequence.
pub fn apply_filters<'a>(
    entries: &'a [ScheduleEntry],
    selection: &FilterSelection,
) -> Vec<&'a ScheduleEntry> {
    let mut filtered: Vec<&ScheduleEntry> = entries.iter().collect();

    if !selection.teacher_ids.is_empty() {
        filtered.retain(|e| matches_teachers(e, &selection.teacher_ids));
    }

    if let Some(class_id) = selection.class_id.as_ref() {
        filtered.retain(|e| matches_class(e, Some(class_id)));
    }

    if let Some(room_id) = selection.room_id.as_ref() {
        filtered.retain(|e| matches_room(e, Some(room_id)));
    }

    filtered
}

/// Split entries into `(period, adhoc)` by schedule type, preserving order.
pub fn partition_by_schedule_type<'a>(
    entries: impl IntoIterator<Item = &'a ScheduleEntry>,
) -> (Vec<&'a ScheduleEntry>, Vec<&'a ScheduleEntry>) {
    entries
        .into_iter()
        .partition(|e| e.schedule_type == ScheduleType::Period)
}
