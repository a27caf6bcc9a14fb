//! Fingerprints of draft snapshots.

use sha2::{Digest, Sha256};

use crate::models::ScheduleEntry;

/// Hex encoded SHA-256 of `content`.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checksum of an entry list as it would be sent on the wire.
///
/// Order matters: the same entries in another order hash differently.
pub fn entries_checksum(entries: &[ScheduleEntry]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(entries)?;
    Ok(calculate_checksum(&json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"day_id": 1}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_entries_checksum_tracks_content() {
        let a = vec![ScheduleEntry::period_slot(1, "p1").with_room("r1")];
        let b = vec![ScheduleEntry::period_slot(1, "p1").with_room("r2")];
        assert_eq!(entries_checksum(&a).unwrap(), entries_checksum(&a.clone()).unwrap());
        assert_ne!(entries_checksum(&a).unwrap(), entries_checksum(&b).unwrap());
    }
}
