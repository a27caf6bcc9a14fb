//! Draft schedule entries (lesson placements).

use serde::{Deserialize, Serialize};

use super::ids::{ClassId, CourseId, DayId, EntryId, PeriodId, RoomId, TeacherId};
use super::slot::SlotKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    /// Aligned to the period grid.
    #[default]
    Period,
    /// Carries explicit start/end times.
    Adhoc,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Period => "period",
            ScheduleType::Adhoc => "adhoc",
        }
    }
}

/// Natural key used for upsert matching.
///
/// Two entries occupy "the same slot" only when all four parts are equal, so a
/// period entry and an ad-hoc entry sharing a period with different explicit
/// times coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub day_id: Option<DayId>,
    pub period_id: Option<PeriodId>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.day_id.map(|d| d.to_string()).unwrap_or_default(),
            self.period_id.as_ref().map(|p| p.value()).unwrap_or(""),
            self.start_time.as_deref().unwrap_or(""),
            self.end_time.as_deref().unwrap_or(""),
        )
    }
}

/// One course occupying one day+period slot in a draft.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(default)]
    pub day_id: Option<DayId>,
    #[serde(default)]
    pub period_id: Option<PeriodId>,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub teacher_ids: Vec<TeacherId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_names: Option<Vec<String>>,
    #[serde(default)]
    pub meeting_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleEntry {
    /// An empty period-grid entry at `(day_id, period_id)`.
    pub fn period_slot(day_id: i64, period_id: impl Into<PeriodId>) -> Self {
        Self {
            day_id: Some(DayId(day_id)),
            period_id: Some(period_id.into()),
            schedule_type: ScheduleType::Period,
            ..Default::default()
        }
    }

    /// An empty ad-hoc entry on `day_id` between `start` and `end`.
    pub fn adhoc(
        day_id: i64,
        period_id: Option<PeriodId>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            day_id: Some(DayId(day_id)),
            period_id,
            schedule_type: ScheduleType::Adhoc,
            start_time: Some(start.into()),
            end_time: Some(end.into()),
            ..Default::default()
        }
    }

    pub fn with_course(mut self, course_id: impl Into<CourseId>) -> Self {
        self.course_id = Some(course_id.into());
        self
    }

    pub fn with_class(mut self, class_id: impl Into<ClassId>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_room(mut self, room_id: impl Into<RoomId>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn with_teachers<I, T>(mut self, teacher_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeacherId>,
    {
        self.teacher_ids = teacher_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            day_id: self.day_id,
            period_id: self.period_id.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }

    pub fn matches_key(&self, other: &ScheduleEntry) -> bool {
        self.day_id == other.day_id
            && self.period_id == other.period_id
            && self.start_time == other.start_time
            && self.end_time == other.end_time
    }

    /// Slot used for double-booking grouping. Ad-hoc entries group by their
    /// day and period as well.
    pub fn slot_key(&self) -> Option<SlotKey> {
        match (self.day_id, self.period_id.as_ref()) {
            (Some(day), Some(period)) if !period.is_empty() => {
                Some(SlotKey::from_parts(day, period.clone()))
            }
            _ => None,
        }
    }

    /// Reference used to attach conflicts to this lesson.
    pub fn lesson_ref(&self) -> String {
        match &self.id {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.key().to_string(),
        }
    }

    pub fn has_teacher(&self, teacher_id: &TeacherId) -> bool {
        self.teacher_ids.iter().any(|t| t == teacher_id)
    }

    /// Teacher ids without duplicates, in first-seen order.
    pub fn distinct_teachers(&self) -> Vec<&TeacherId> {
        let mut seen: Vec<&TeacherId> = Vec::with_capacity(self.teacher_ids.len());
        for id in &self.teacher_ids {
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    pub fn has_explicit_times(&self) -> bool {
        self.start_time.as_deref().is_some_and(|s| !s.is_empty())
            && self.end_time.as_deref().is_some_and(|s| !s.is_empty())
    }
}
