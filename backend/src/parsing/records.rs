//! Upstream record normalisation.
//!
//! The dashboards feeding the planner do not agree on field names: courses
//! carry `name`, `course_name` or `title`, teachers carry `hours_account` or
//! `total_hours`, identifiers show up as strings or numbers. The `Raw*`
//! structs accept all of these and the `normalize_*` functions map them onto
//! the canonical model once, at ingestion time.

use serde::Deserialize;
use serde_json::Value;

use super::slots::normalize_possible_slots;
use crate::models::{
    ClassId, Course, CourseId, Day, DayId, EntryId, Period, PeriodId, Room, RoomId, ScheduleEntry,
    ScheduleType, SchoolClass, Teacher, TeacherId,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPeriod {
    pub id: Option<Value>,
    pub period_id: Option<Value>,
    pub block_number: Option<Value>,
    pub order: Option<Value>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_instructional: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDay {
    pub day_id: Option<Value>,
    pub id: Option<Value>,
    pub day_number: Option<Value>,
    pub number: Option<Value>,
    pub name_localized: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCourse {
    pub id: Option<Value>,
    pub course_id: Option<Value>,
    pub name: Option<String>,
    pub course_name: Option<String>,
    pub title: Option<String>,
    pub code: Option<String>,
    pub capacity: Option<Value>,
    pub subject: Option<String>,
    pub year_groups: Option<Vec<Value>>,
    pub possible_slots: Option<Value>,
    pub time_slots: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeacher {
    pub id: Option<Value>,
    pub teacher_id: Option<Value>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hours_account: Option<Value>,
    pub total_hours: Option<Value>,
    pub age_reduction: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRoom {
    pub id: Option<Value>,
    pub room_id: Option<Value>,
    pub name: Option<String>,
    pub room_name: Option<String>,
    pub is_active: Option<bool>,
    pub active: Option<bool>,
    pub assigned_class_id: Option<Value>,
    pub class_id: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawClass {
    pub id: Option<Value>,
    pub class_id: Option<Value>,
    pub name: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    pub id: Option<Value>,
    pub day_id: Option<Value>,
    pub period_id: Option<Value>,
    pub schedule_type: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub course_id: Option<Value>,
    pub subject_id: Option<Value>,
    pub class_id: Option<Value>,
    pub room_id: Option<Value>,
    pub teacher_ids: Option<Vec<Value>>,
    pub teacher_id: Option<Value>,
    pub teacher_names: Option<Vec<String>>,
    pub meeting_name: Option<String>,
    pub notes: Option<String>,
}

pub fn normalize_period(raw: RawPeriod) -> Option<Period> {
    let id = first_string(&[&raw.id, &raw.period_id])?;
    let block_number = first_i64(&[&raw.block_number, &raw.order]).unwrap_or(0) as i32;
    let label = non_blank(raw.label)
        .or_else(|| non_blank(raw.name))
        .unwrap_or_else(|| format!("Block {}", block_number));
    let time = non_blank(raw.time).unwrap_or_else(|| match (raw.start_time, raw.end_time) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        (Some(start), None) => start,
        _ => String::new(),
    });

    Some(Period {
        id: PeriodId(id),
        block_number,
        label,
        time,
        is_instructional: raw.is_instructional.unwrap_or(true),
    })
}

pub fn normalize_day(raw: RawDay) -> Option<Day> {
    let day_id = first_i64(&[&raw.day_id, &raw.id])?;
    let day_number = first_i64(&[&raw.day_number, &raw.number]).unwrap_or(day_id) as i32;
    Some(Day {
        day_id: DayId(day_id),
        day_number,
        name_localized: non_blank(raw.name_localized)
            .or_else(|| non_blank(raw.name))
            .unwrap_or_default(),
    })
}

pub fn normalize_course(raw: RawCourse) -> Option<Course> {
    let id = first_string(&[&raw.id, &raw.course_id])?;
    let name = non_blank(raw.name)
        .or_else(|| non_blank(raw.course_name))
        .or_else(|| non_blank(raw.title))
        .unwrap_or_else(|| id.clone());
    let possible_slots = raw
        .possible_slots
        .as_ref()
        .or(raw.time_slots.as_ref())
        .map(normalize_possible_slots)
        .unwrap_or_default();

    Some(Course {
        id: CourseId(id),
        name,
        code: non_blank(raw.code),
        capacity: raw
            .capacity
            .as_ref()
            .and_then(value_to_i64)
            .and_then(|c| u32::try_from(c).ok()),
        subject: non_blank(raw.subject),
        year_groups: raw
            .year_groups
            .unwrap_or_default()
            .iter()
            .filter_map(value_to_string)
            .collect(),
        possible_slots,
    })
}

pub fn normalize_teacher(raw: RawTeacher) -> Option<Teacher> {
    let id = first_string(&[&raw.id, &raw.teacher_id])?;
    let joined = match (non_blank(raw.first_name), non_blank(raw.last_name)) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first),
        (None, Some(last)) => Some(last),
        (None, None) => None,
    };
    let name = non_blank(raw.name)
        .or_else(|| non_blank(raw.full_name))
        .or(joined)
        .unwrap_or_else(|| id.clone());
    let hours_account = first_i64(&[&raw.hours_account, &raw.total_hours])
        .and_then(|h| u32::try_from(h).ok());

    Some(Teacher {
        id: TeacherId(id),
        name,
        hours_account,
        age_reduction: raw.age_reduction.as_ref().and_then(value_to_f64),
    })
}

pub fn normalize_room(raw: RawRoom) -> Option<Room> {
    let id = first_string(&[&raw.id, &raw.room_id])?;
    Some(Room {
        name: non_blank(raw.name)
            .or_else(|| non_blank(raw.room_name))
            .unwrap_or_else(|| id.clone()),
        id: RoomId(id),
        is_active: raw.is_active.or(raw.active).unwrap_or(true),
        assigned_class_id: first_string(&[&raw.assigned_class_id, &raw.class_id]).map(ClassId),
    })
}

pub fn normalize_class(raw: RawClass) -> Option<SchoolClass> {
    let id = first_string(&[&raw.id, &raw.class_id])?;
    Some(SchoolClass {
        name: non_blank(raw.name)
            .or_else(|| non_blank(raw.class_name))
            .unwrap_or_else(|| id.clone()),
        id: ClassId(id),
    })
}

/// Entries are kept even when incomplete; the conflict detector reports what
/// is missing.
pub fn normalize_entry(raw: RawEntry) -> ScheduleEntry {
    let mut teacher_ids: Vec<TeacherId> = raw
        .teacher_ids
        .unwrap_or_default()
        .iter()
        .filter_map(value_to_string)
        .map(TeacherId)
        .collect();
    if teacher_ids.is_empty() {
        if let Some(single) = raw.teacher_id.as_ref().and_then(value_to_string) {
            teacher_ids.push(TeacherId(single));
        }
    }

    let start_time = non_blank(raw.start_time);
    let end_time = non_blank(raw.end_time);
    let schedule_type = match raw.schedule_type.as_deref().map(str::to_lowercase).as_deref() {
        Some("adhoc") | Some("ad_hoc") | Some("ad-hoc") | Some("time") => ScheduleType::Adhoc,
        Some(_) => ScheduleType::Period,
        None if start_time.is_some() && end_time.is_some() => ScheduleType::Adhoc,
        None => ScheduleType::Period,
    };

    ScheduleEntry {
        id: raw.id.as_ref().and_then(value_to_string).map(EntryId),
        day_id: raw
            .day_id
            .as_ref()
            .and_then(value_to_i64)
            .filter(|d| *d > 0)
            .map(DayId),
        period_id: raw.period_id.as_ref().and_then(value_to_string).map(PeriodId),
        schedule_type,
        start_time,
        end_time,
        course_id: first_string(&[&raw.course_id, &raw.subject_id]).map(CourseId),
        class_id: raw.class_id.as_ref().and_then(value_to_string).map(ClassId),
        room_id: raw.room_id.as_ref().and_then(value_to_string).map(RoomId),
        teacher_ids,
        teacher_names: raw.teacher_names.filter(|names| !names.is_empty()),
        meeting_name: non_blank(raw.meeting_name),
        notes: non_blank(raw.notes),
    }
}

/// Normalise a list, dropping records without an identifier.
pub fn normalize_all<R, T>(raw: Vec<R>, kind: &str, f: impl Fn(R) -> Option<T>) -> Vec<T> {
    let total = raw.len();
    let normalized: Vec<T> = raw.into_iter().filter_map(f).collect();
    if normalized.len() < total {
        log::warn!(
            "Dropped {} {} record(s) without an identifier",
            total - normalized.len(),
            kind
        );
    }
    normalized
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn first_string(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_ref())
        .find_map(value_to_string)
}

fn first_i64(candidates: &[&Option<Value>]) -> Option<i64> {
    candidates
        .iter()
        .filter_map(|c| c.as_ref())
        .find_map(value_to_i64)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
