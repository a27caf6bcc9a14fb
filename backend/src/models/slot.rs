//! Canonical addressing of a scheduling slot.

use serde::{Deserialize, Serialize};

use super::ids::{DayId, PeriodId};

/// A `(day_id, period_id)` address in the weekly grid.
///
/// `day_id` is always the backend day identifier, never the UI day number.
/// Ordering is by day first, then by period id; display order inside a day
/// comes from [`Period::block_number`](super::Period::block_number).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub day_id: DayId,
    pub period_id: PeriodId,
}

impl SlotKey {
    pub fn new(day_id: i64, period_id: impl Into<PeriodId>) -> Self {
        Self {
            day_id: DayId(day_id),
            period_id: period_id.into(),
        }
    }

    pub fn from_parts(day_id: DayId, period_id: PeriodId) -> Self {
        Self { day_id, period_id }
    }

    /// The impossible slot produced for malformed tokens.
    pub fn sentinel() -> Self {
        Self {
            day_id: DayId(0),
            period_id: PeriodId::default(),
        }
    }

    /// False for the sentinel slot; it can never match a real grid cell.
    pub fn is_valid(&self) -> bool {
        self.day_id.value() > 0 && !self.period_id.is_empty()
    }

    pub fn matches(&self, day_id: DayId, period_id: &PeriodId) -> bool {
        self.is_valid() && self.day_id == day_id && &self.period_id == period_id
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.day_id, self.period_id)
    }
}
