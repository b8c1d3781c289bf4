//! Record-level merge of one domain
//!
//! Each known field is reconciled by its policy from the domain table:
//!
//! - record arrays: union by `id`, a backup record replaces the whole
//!   current record with the same id
//! - settings objects: shallow merge, backup fields overwrite
//! - counters and streak maxima: numeric max, so progress never regresses
//!
//! Unknown fields are taken from the backup when it has them.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde_json::{Map, Value};

use crate::models::{id_key, is_streak_maximum, record_id, Domain, DomainState, FieldPolicy};

/// Merge a backup snapshot of `domain` into its current state
pub fn merge_domain(domain: Domain, current: &DomainState, backup: &DomainState) -> DomainState {
    let mut merged = current.clone();

    for (field, backup_value) in backup {
        let value = match (current.get(field), domain.policy_of(field)) {
            (None, _) | (Some(_), None) => backup_value.clone(),
            (Some(current_value), Some(policy)) => {
                debug!("Merging {}.{} as {:?}", domain, field, policy);
                merge_field(policy, current_value, backup_value)
            }
        };
        merged.insert(field.clone(), value);
    }

    merged
}

fn merge_field(policy: FieldPolicy, current: &Value, backup: &Value) -> Value {
    match policy {
        FieldPolicy::NamedRecords | FieldPolicy::Records => merge_records(current, backup),
        FieldPolicy::Settings => merge_settings(current, backup),
        FieldPolicy::Counter => max_counter(current, backup),
        FieldPolicy::Streaks => merge_streaks(current, backup),
    }
}

/// Union two record arrays by id, backup winning on collision
pub fn merge_records(current: &Value, backup: &Value) -> Value {
    match (current.as_array(), backup.as_array()) {
        (Some(current), Some(backup)) => Value::Array(merge_record_lists(current, backup)),
        (_, Some(_)) => backup.clone(),
        _ => current.clone(),
    }
}

fn merge_record_lists(current: &[Value], backup: &[Value]) -> Vec<Value> {
    let incoming: HashMap<String, &Value> = backup
        .iter()
        .filter_map(|record| record_id(record).map(|id| (id_key(id), record)))
        .collect();

    let mut merged = Vec::with_capacity(current.len() + backup.len());
    let mut placed = HashSet::new();

    // Current order is kept, colliding records are swapped in place
    for record in current {
        let key = record_id(record).map(id_key);
        match key.as_ref().and_then(|k| incoming.get(k)) {
            Some(replacement) => merged.push((*replacement).clone()),
            None => merged.push(record.clone()),
        }
        if let Some(key) = key {
            placed.insert(key);
        }
    }

    for record in backup {
        match record_id(record).map(id_key) {
            Some(key) => {
                if placed.insert(key.clone()) {
                    merged.push(incoming[&key].clone());
                }
            }
            None => {
                if !current.contains(record) {
                    merged.push(record.clone());
                }
            }
        }
    }

    merged
}

/// Shallow object merge, backup fields overwrite current fields
pub fn merge_settings(current: &Value, backup: &Value) -> Value {
    match (current.as_object(), backup.as_object()) {
        (Some(current), Some(backup)) => {
            let mut merged = current.clone();
            for (key, value) in backup {
                merged.insert(key.clone(), value.clone());
            }
            Value::Object(merged)
        }
        (_, Some(_)) => backup.clone(),
        _ => current.clone(),
    }
}

/// The larger of two counters; a non-numeric side loses
pub fn max_counter(current: &Value, backup: &Value) -> Value {
    match (current.as_f64(), backup.as_f64()) {
        (Some(c), Some(b)) if b > c => backup.clone(),
        (Some(_), _) => current.clone(),
        (None, Some(_)) => backup.clone(),
        (None, None) => current.clone(),
    }
}

fn merge_streaks(current: &Value, backup: &Value) -> Value {
    match (current.as_object(), backup.as_object()) {
        (Some(current), Some(backup)) => {
            let mut merged: Map<String, Value> = current.clone();
            for (key, value) in backup {
                let value = match current.get(key) {
                    Some(existing) if is_streak_maximum(key) => max_counter(existing, value),
                    _ => value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, Some(_)) => backup.clone(),
        _ => current.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> DomainState {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_merge_into_empty_array() {
        let current = state(json!({ "exercises": [] }));
        let backup = state(json!({ "exercises": [{ "id": 1, "name": "x" }] }));

        let merged = merge_domain(Domain::Workout, &current, &backup);
        assert_eq!(merged["exercises"], json!([{ "id": 1, "name": "x" }]));
    }

    #[test]
    fn test_backup_record_wins_on_id_collision() {
        let current = state(json!({ "workoutHistory": [{ "id": 1, "v": 1, "extra": true }] }));
        let backup = state(json!({ "workoutHistory": [{ "id": 1, "v": 2 }] }));

        let merged = merge_domain(Domain::Workout, &current, &backup);
        // Whole record replaced, `extra` is gone
        assert_eq!(merged["workoutHistory"], json!([{ "id": 1, "v": 2 }]));
    }

    #[test]
    fn test_union_keeps_current_order_then_appends() {
        let current = state(json!({
            "foodItems": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }]
        }));
        let backup = state(json!({
            "foodItems": [{ "id": "c", "name": "C" }, { "id": "a", "name": "A2" }]
        }));

        let merged = merge_domain(Domain::Nutrition, &current, &backup);
        assert_eq!(
            merged["foodItems"],
            json!([
                { "id": "a", "name": "A2" },
                { "id": "b", "name": "B" },
                { "id": "c", "name": "C" }
            ])
        );
    }

    #[test]
    fn test_merge_with_itself_is_a_no_op() {
        let a = state(json!({
            "workoutPlans": [{ "id": "p1", "name": "Push" }],
            "notesHistory": [{ "id": 3, "text": "felt good" }, { "text": "no id" }],
            "userProfile": { "name": "Alex", "height": 180 },
            "theme": "dark"
        }));

        assert_eq!(merge_domain(Domain::Workout, &a, &a), a);

        let g = state(json!({
            "badges": [{ "id": "b1", "name": "First", "unlocked": true }],
            "userPoints": 40,
            "userLevel": 2,
            "streaks": { "currentStreak": 1, "longestStreak": 9 }
        }));
        assert_eq!(merge_domain(Domain::Gamification, &g, &g), g);
    }

    #[test]
    fn test_counters_take_the_max() {
        let current = state(json!({ "userPoints": 50, "userLevel": 2 }));
        let backup = state(json!({ "userPoints": 30, "userLevel": 5 }));

        let merged = merge_domain(Domain::Gamification, &current, &backup);
        assert_eq!(merged["userPoints"], json!(50));
        assert_eq!(merged["userLevel"], json!(5));

        let current = state(json!({ "userPoints": 20 }));
        let backup = state(json!({ "userPoints": 80 }));
        let merged = merge_domain(Domain::Gamification, &current, &backup);
        assert_eq!(merged["userPoints"], json!(80));
    }

    #[test]
    fn test_non_numeric_counter_loses() {
        assert_eq!(max_counter(&json!("bad"), &json!(3)), json!(3));
        assert_eq!(max_counter(&json!(7), &json!(null)), json!(7));
    }

    #[test]
    fn test_settings_shallow_merge() {
        let current = state(json!({ "nutritionGoals": { "calories": 2000, "protein": 120 } }));
        let backup = state(json!({ "nutritionGoals": { "calories": 2200, "water": 3 } }));

        let merged = merge_domain(Domain::Nutrition, &current, &backup);
        assert_eq!(
            merged["nutritionGoals"],
            json!({ "calories": 2200, "protein": 120, "water": 3 })
        );
    }

    #[test]
    fn test_streak_maxima_never_regress() {
        let current = state(json!({
            "streaks": { "currentStreak": 10, "longestStreak": 12, "lastActive": "2024-05-02" }
        }));
        let backup = state(json!({
            "streaks": { "currentStreak": 2, "longestStreak": 8, "lastActive": "2024-04-01" }
        }));

        let merged = merge_domain(Domain::Gamification, &current, &backup);
        assert_eq!(
            merged["streaks"],
            json!({ "currentStreak": 2, "longestStreak": 12, "lastActive": "2024-04-01" })
        );
    }

    #[test]
    fn test_fields_missing_on_one_side() {
        let current = state(json!({ "exercises": [{ "id": 1, "name": "x" }] }));
        let backup = state(json!({ "bodyMeasurements": [{ "id": "m1" }], "theme": "light" }));

        let merged = merge_domain(Domain::Workout, &current, &backup);
        assert_eq!(merged["exercises"], json!([{ "id": 1, "name": "x" }]));
        assert_eq!(merged["bodyMeasurements"], json!([{ "id": "m1" }]));
        assert_eq!(merged["theme"], json!("light"));
    }

    #[test]
    fn test_malformed_current_array_is_replaced() {
        assert_eq!(
            merge_records(&json!({ "oops": 1 }), &json!([{ "id": 1 }])),
            json!([{ "id": 1 }])
        );
        assert_eq!(merge_records(&json!([{ "id": 1 }]), &json!("bad")), json!([{ "id": 1 }]));
    }
}
