//! Reference entities of a school: periods, days, courses, teachers, rooms
//! and classes.
//!
//! These are the canonical shapes. Upstream records with alternate field
//! names are mapped onto them in [`crate::parsing`].

use serde::{Deserialize, Serialize};

use super::entry::ScheduleEntry;
use super::ids::{ClassId, CourseId, DayId, PeriodId, RoomId, TeacherId};
use super::slot::SlotKey;

/// A named teaching time block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Backend identifier. Never a synthesized display index.
    pub id: PeriodId,
    /// 1-based display order; used for sorting only.
    pub block_number: i32,
    pub label: String,
    /// Display string such as `"08:00 - 08:45"`.
    #[serde(default)]
    pub time: String,
    /// False for breaks, lunch and assembly blocks.
    #[serde(default = "default_true")]
    pub is_instructional: bool,
}

/// A school day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day_id: DayId,
    /// UI ordering only. Not comparable with `day_id`.
    pub day_number: i32,
    #[serde(default)]
    pub name_localized: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub year_groups: Vec<String>,
    /// Slots this course may occupy. Empty means "anywhere".
    #[serde(default)]
    pub possible_slots: Vec<SlotKey>,
}

impl Course {
    /// Whether the course may be placed at `slot`.
    ///
    /// Sentinel slots left by malformed tokens never match, so a course whose
    /// only restriction was malformed is available nowhere rather than
    /// everywhere.
    pub fn is_available_at(&self, day_id: DayId, period_id: &PeriodId) -> bool {
        self.possible_slots.is_empty()
            || self
                .possible_slots
                .iter()
                .any(|slot| slot.matches(day_id, period_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    /// Maximum number of lessons this teacher may be assigned.
    #[serde(default)]
    pub hours_account: Option<u32>,
    #[serde(default)]
    pub age_reduction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Set when the room is the home room of a class.
    #[serde(default)]
    pub assigned_class_id: Option<ClassId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolClass {
    pub id: ClassId,
    pub name: String,
}

fn default_true() -> bool {
    true
}

/// Reference data supplied by the surrounding application.
///
/// All lookups are linear; school-sized reference lists are small.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub periods: Vec<Period>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_teachers(mut self, teachers: Vec<Teacher>) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_classes(mut self, classes: Vec<SchoolClass>) -> Self {
        self.classes = classes;
        self
    }

    pub fn with_rooms(mut self, rooms: Vec<Room>) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn with_periods(mut self, periods: Vec<Period>) -> Self {
        self.periods = periods;
        self
    }

    pub fn teacher(&self, id: &TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| &t.id == id)
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == id)
    }

    pub fn class(&self, id: &ClassId) -> Option<&SchoolClass> {
        self.classes.iter().find(|c| &c.id == id)
    }

    pub fn period(&self, id: &PeriodId) -> Option<&Period> {
        self.periods.iter().find(|p| &p.id == id)
    }

    pub fn block_number_of(&self, id: &PeriodId) -> Option<i32> {
        self.period(id).map(|p| p.block_number)
    }

    pub fn teacher_name(&self, id: &TeacherId) -> String {
        self.teacher(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn room_name(&self, id: &RoomId) -> String {
        self.room(id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn class_name(&self, id: &ClassId) -> String {
        self.class(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Display names for the teachers of an entry.
    ///
    /// Precomputed `teacher_names` win; otherwise ids are resolved against
    /// the teacher list.
    pub fn teacher_display_names(&self, entry: &ScheduleEntry) -> Vec<String> {
        if let Some(names) = entry.teacher_names.as_ref().filter(|n| !n.is_empty()) {
            return names.clone();
        }
        entry
            .teacher_ids
            .iter()
            .map(|id| self.teacher_name(id))
            .collect()
    }
}
