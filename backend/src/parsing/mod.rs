//! Ingestion of upstream planner data.
//!
//! - [`records`]: heterogeneous upstream records → canonical model
//! - [`slots`]: course `possible_slots` token parsing
//!
//! [`parse_snapshot_str`] reads a whole planner snapshot (periods, days,
//! entries and reference lists) from one JSON document.

pub mod records;
pub mod slots;

pub use records::{
    normalize_class, normalize_course, normalize_day, normalize_entry, normalize_period,
    normalize_room, normalize_teacher, RawClass, RawCourse, RawDay, RawEntry, RawPeriod, RawRoom,
    RawTeacher,
};
pub use slots::{normalize_possible_slots, parse_possible_slot, parse_slot_token_str};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::models::{Course, Day, Period, ReferenceData, ScheduleEntry, SeedData};

#[derive(Debug, Default, Deserialize)]
struct SnapshotInput {
    #[serde(default)]
    periods: Vec<RawPeriod>,
    #[serde(default)]
    days: Vec<RawDay>,
    #[serde(default)]
    entries: Vec<RawEntry>,
    #[serde(default)]
    teachers: Vec<RawTeacher>,
    #[serde(default)]
    classes: Vec<RawClass>,
    #[serde(default)]
    rooms: Vec<RawRoom>,
    #[serde(default)]
    courses: Vec<RawCourse>,
}

/// A normalised planner snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub periods: Vec<Period>,
    pub days: Vec<Day>,
    pub entries: Vec<ScheduleEntry>,
    pub courses: Vec<Course>,
    pub references: ReferenceData,
}

impl Snapshot {
    pub fn seed(&self) -> SeedData {
        SeedData::new(self.periods.clone(), self.entries.clone())
    }
}

/// Parse a planner snapshot from a JSON string.
pub fn parse_snapshot_str(json: &str) -> Result<Snapshot> {
    let input: SnapshotInput =
        serde_json::from_str(json).context("Failed to deserialize planner snapshot JSON")?;

    let periods = records::normalize_all(input.periods, "period", normalize_period);
    let references = ReferenceData {
        teachers: records::normalize_all(input.teachers, "teacher", normalize_teacher),
        classes: records::normalize_all(input.classes, "class", normalize_class),
        rooms: records::normalize_all(input.rooms, "room", normalize_room),
        periods: periods.clone(),
    };

    let snapshot = Snapshot {
        periods,
        days: records::normalize_all(input.days, "day", normalize_day),
        entries: input.entries.into_iter().map(normalize_entry).collect(),
        courses: records::normalize_all(input.courses, "course", normalize_course),
        references,
    };

    log::debug!(
        "Parsed snapshot: {} periods, {} entries, {} teachers, {} rooms, {} classes, {} courses",
        snapshot.periods.len(),
        snapshot.entries.len(),
        snapshot.references.teachers.len(),
        snapshot.references.rooms.len(),
        snapshot.references.classes.len(),
        snapshot.courses.len(),
    );

    Ok(snapshot)
}

/// Parse a planner snapshot from a JSON file.
pub fn parse_snapshot_file<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    parse_snapshot_str(&content)
}
