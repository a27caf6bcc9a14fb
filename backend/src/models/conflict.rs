//! Computed conflict records. Never persisted.

use serde::{Deserialize, Serialize};

use super::ids::{ConflictId, CourseId, DayId, PeriodId};
use super::slot::SlotKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    TeacherDoubleBooking,
    RoomDoubleBooking,
    ClassDoubleBooking,
    TeacherOverload,
    InactiveRoom,
    MissingData,
    ClassWrongRoom,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::TeacherDoubleBooking => "teacher_double_booking",
            ConflictType::RoomDoubleBooking => "room_double_booking",
            ConflictType::ClassDoubleBooking => "class_double_booking",
            ConflictType::TeacherOverload => "teacher_overload",
            ConflictType::InactiveRoom => "inactive_room",
            ConflictType::MissingData => "missing_data",
            ConflictType::ClassWrongRoom => "class_wrong_room",
        }
    }

    /// Only room clashes; a free room can be picked without a planner.
    pub fn is_auto_resolvable(&self) -> bool {
        matches!(self, ConflictType::RoomDoubleBooking)
    }
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// Type-specific payload of a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConflictDetails {
    #[default]
    None,
    Overload {
        assigned: u32,
        limit: u32,
    },
    MissingFields {
        fields: Vec<String>,
    },
    WrongRoom {
        entry_class: String,
        room_class: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Built from `(type, resource, slot)`, or the entry key when there is no
    /// slot, so re-detection yields the same id.
    pub id: ConflictId,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    pub severity: Severity,
    pub day_id: Option<DayId>,
    pub period_id: Option<PeriodId>,
    /// Teacher, room or class ids the conflict is about.
    pub resource_ids: Vec<String>,
    pub course_ids: Vec<CourseId>,
    /// [`ScheduleEntry::lesson_ref`](super::ScheduleEntry::lesson_ref) of every affected entry.
    pub lesson_refs: Vec<String>,
    pub message: String,
    pub auto_resolvable: bool,
    #[serde(default)]
    pub details: ConflictDetails,
}

impl Conflict {
    /// Deterministic conflict id.
    pub fn build_id(
        conflict_type: ConflictType,
        resource: &str,
        slot: Option<&SlotKey>,
    ) -> ConflictId {
        match slot {
            Some(slot) => Self::build_id_at(conflict_type, resource, slot),
            None => Self::build_id_at(conflict_type, resource, "*"),
        }
    }

    /// Id located by an arbitrary token, for lessons that have no grid slot.
    pub fn build_id_at(
        conflict_type: ConflictType,
        resource: &str,
        location: impl std::fmt::Display,
    ) -> ConflictId {
        ConflictId(format!("{}:{}:{}", conflict_type.as_str(), resource, location))
    }

    pub fn slot_key(&self) -> Option<SlotKey> {
        match (self.day_id, self.period_id.as_ref()) {
            (Some(day), Some(period)) => Some(SlotKey::from_parts(day, period.clone())),
            _ => None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    pub fn affects_lesson(&self, lesson_ref: &str) -> bool {
        self.id.value() == lesson_ref || self.lesson_refs.iter().any(|r| r == lesson_ref)
    }
}
