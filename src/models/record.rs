//! Helpers for id-bearing records inside domain arrays

use serde_json::Value;

/// The record's `id`, if present and non-empty
///
/// `null`, the empty string and a missing key all count as no id.
pub fn record_id(record: &Value) -> Option<&Value> {
    match record.get("id")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        id => Some(id),
    }
}

/// Comparable form of an id; `1` and `"1"` stay distinct
pub fn id_key(id: &Value) -> String {
    id.to_string()
}

/// Whether the record carries a non-empty string `name`
pub fn has_name(record: &Value) -> bool {
    record
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id() {
        assert_eq!(record_id(&json!({ "id": 7 })), Some(&json!(7)));
        assert_eq!(record_id(&json!({ "id": "abc" })), Some(&json!("abc")));
        assert_eq!(record_id(&json!({ "id": "" })), None);
        assert_eq!(record_id(&json!({ "id": null })), None);
        assert_eq!(record_id(&json!({ "name": "x" })), None);
        assert_eq!(record_id(&json!("scalar")), None);
    }

    #[test]
    fn test_id_key_keeps_types_apart() {
        assert_ne!(id_key(&json!(1)), id_key(&json!("1")));
    }

    #[test]
    fn test_has_name() {
        assert!(has_name(&json!({ "name": "Bench press" })));
        assert!(!has_name(&json!({ "name": "" })));
        assert!(!has_name(&json!({ "name": 3 })));
        assert!(!has_name(&json!({})));
    }
}
