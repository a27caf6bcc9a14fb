//! Draft lifecycle value types.

use serde::{Deserialize, Serialize};

use super::entities::Period;
use super::entry::ScheduleEntry;

/// Grid presentation mode chosen by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Period,
    Time,
}

/// `Uninitialized → Loaded → {Editing ⇄ Saving} → Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftPhase {
    #[default]
    Uninitialized,
    Loaded,
    Editing,
    Saving,
    Published,
}

impl DraftPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftPhase::Uninitialized => "uninitialized",
            DraftPhase::Loaded => "loaded",
            DraftPhase::Editing => "editing",
            DraftPhase::Saving => "saving",
            DraftPhase::Published => "published",
        }
    }
}

/// Periods and entries handed over at initialisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

impl SeedData {
    pub fn new(periods: Vec<Period>, entries: Vec<ScheduleEntry>) -> Self {
        Self { periods, entries }
    }
}

/// Partial refresh from upstream; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataUpdate {
    pub periods: Option<Vec<Period>>,
    pub entries: Option<Vec<ScheduleEntry>>,
}

impl DataUpdate {
    pub fn periods(periods: Vec<Period>) -> Self {
        Self {
            periods: Some(periods),
            entries: None,
        }
    }

    pub fn entries(entries: Vec<ScheduleEntry>) -> Self {
        Self {
            periods: None,
            entries: Some(entries),
        }
    }
}

/// Result of `publish`, rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub message: String,
}

impl PublishResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
