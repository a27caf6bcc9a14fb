//! Course availability for a slot.

use crate::models::{Course, DayId, PeriodId};

/// Courses that may be placed at `(day_id, period_id)`, in input order.
///
/// A course with no `possible_slots` is available anywhere. A course whose
/// slot list only held malformed tokens carries the sentinel slot and is
/// available nowhere.
pub fn get_available_courses_for_slot<'a>(
    day_id: DayId,
    period_id: &PeriodId,
    courses: &'a [Course],
) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|course| course.is_available_at(day_id, period_id))
        .collect()
}
