//! Identifier newtypes.
//!
//! Days are addressed by the backend integer `day_id`; everything else by the
//! opaque string identifiers the backend hands out.

use crate::{define_id_type, define_str_id_type};

define_id_type!(i64, DayId);

define_str_id_type!(PeriodId);
define_str_id_type!(SchoolId);
define_str_id_type!(DraftId);
define_str_id_type!(TeacherId);
define_str_id_type!(ClassId);
define_str_id_type!(RoomId);
define_str_id_type!(CourseId);
define_str_id_type!(EntryId);
define_str_id_type!(ConflictId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_id_roundtrip() {
        let day = DayId::new(3);
        assert_eq!(day.value(), 3);
        assert_eq!(i64::from(day), 3);
        assert_eq!(day.to_string(), "3");
    }

    #[test]
    fn test_str_id_serializes_transparently() {
        let id = TeacherId::from("t-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"t-1\"");
        let back: TeacherId = serde_json::from_str("\"t-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_blank_id_is_empty() {
        assert!(RoomId::new("  ").is_empty());
        assert!(!RoomId::new("r1").is_empty());
    }
}
