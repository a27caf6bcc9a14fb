//! Parsing of course `possible_slots` tokens.
//!
//! Tokens arrive either as `"<dayId>|<periodId>"` strings or as
//! `{ "day_id": .., "period_id": .. }` objects. Anything else becomes the
//! sentinel slot, which never matches a real grid cell.

use serde_json::Value;

use crate::models::{DayId, PeriodId, SlotKey};

/// Parse a single token. Never fails; malformed input yields
/// [`SlotKey::sentinel`].
pub fn parse_possible_slot(token: &Value) -> SlotKey {
    match token {
        Value::String(s) => parse_slot_token_str(s),
        Value::Object(map) => {
            let day = map.get("day_id").or_else(|| map.get("dayId"));
            let period = map.get("period_id").or_else(|| map.get("periodId"));
            match (day.and_then(day_from_value), period.and_then(period_from_value)) {
                (Some(day), Some(period)) => SlotKey::from_parts(day, period),
                _ => SlotKey::sentinel(),
            }
        }
        _ => SlotKey::sentinel(),
    }
}

/// Parse the `"<dayId>|<periodId>"` string form.
pub fn parse_slot_token_str(token: &str) -> SlotKey {
    let Some((day, period)) = token.trim().split_once('|') else {
        return SlotKey::sentinel();
    };
    let period = period.trim();
    match day.trim().parse::<i64>() {
        Ok(day) if day > 0 && !period.is_empty() => SlotKey::new(day, period),
        _ => SlotKey::sentinel(),
    }
}

/// Parse a whole `possible_slots` value.
///
/// Accepts a JSON array of tokens or a comma separated string. Malformed
/// tokens collapse into a single sentinel entry so a restricted course is not
/// mistaken for an unrestricted one.
pub fn normalize_possible_slots(value: &Value) -> Vec<SlotKey> {
    let tokens: Vec<SlotKey> = match value {
        Value::Array(items) => items.iter().map(parse_possible_slot).collect(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => s.split(',').map(parse_slot_token_str).collect(),
        Value::Null => Vec::new(),
        other => vec![parse_possible_slot(other)],
    };

    let mut slots: Vec<SlotKey> = Vec::with_capacity(tokens.len());
    let mut saw_malformed = false;
    for slot in tokens {
        if !slot.is_valid() {
            saw_malformed = true;
            continue;
        }
        if !slots.contains(&slot) {
            slots.push(slot);
        }
    }

    if slots.is_empty() && saw_malformed {
        log::warn!("possible_slots contained only malformed tokens: {}", value);
        slots.push(SlotKey::sentinel());
    }
    slots
}

fn day_from_value(value: &Value) -> Option<DayId> {
    let day = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (day > 0).then_some(DayId(day))
}

fn period_from_value(value: &Value) -> Option<PeriodId> {
    let period = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!period.is_empty()).then_some(PeriodId(period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_token() {
        let slot = parse_possible_slot(&json!("2|abc-uuid"));
        assert_eq!(slot, SlotKey::new(2, "abc-uuid"));
    }

    #[test]
    fn test_object_token() {
        let slot = parse_possible_slot(&json!({"day_id": 3, "period_id": "p-4"}));
        assert_eq!(slot, SlotKey::new(3, "p-4"));

        let slot = parse_possible_slot(&json!({"day_id": "5", "period_id": 7}));
        assert_eq!(slot, SlotKey::new(5, "7"));
    }

    #[test]
    fn test_malformed_tokens_become_sentinel() {
        for token in [
            json!("bad"),
            json!("x|p1"),
            json!("0|p1"),
            json!("2|"),
            json!({"day_id": 1}),
            json!(42),
            json!(null),
        ] {
            let slot = parse_possible_slot(&token);
            assert!(!slot.is_valid(), "token {} should be invalid", token);
            assert!(slot.day_id.value() <= 0 || slot.period_id.is_empty());
        }
    }

    #[test]
    fn test_normalize_drops_malformed_and_duplicates() {
        let slots = normalize_possible_slots(&json!([
            "1|p1",
            "bad",
            "1|p1",
            {"day_id": 2, "period_id": "p2"}
        ]));
        assert_eq!(slots, vec![SlotKey::new(1, "p1"), SlotKey::new(2, "p2")]);
    }

    #[test]
    fn test_normalize_only_malformed_keeps_sentinel() {
        let slots = normalize_possible_slots(&json!(["bad"]));
        assert_eq!(slots, vec![SlotKey::sentinel()]);
    }

    #[test]
    fn test_normalize_comma_string() {
        let slots = normalize_possible_slots(&json!("1|a, 2|b"));
        assert_eq!(slots, vec![SlotKey::new(1, "a"), SlotKey::new(2, "b")]);
        assert!(normalize_possible_slots(&json!("")).is_empty());
    }
}
