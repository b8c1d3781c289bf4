//! Backup statistics
//!
//! Pure summary of a backup: record counts per domain, progress counters and
//! the serialized size. Missing or mistyped fields count as zero.

use serde::Serialize;
use serde_json::Value;

use crate::models::{Backup, DomainState};

/// Counts describing a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BackupStats {
    pub workout_plans: usize,
    pub exercises: usize,
    pub workout_history: usize,
    pub body_measurements: usize,
    pub notes: usize,
    pub nutrition_plans: usize,
    pub food_items: usize,
    pub daily_logs: usize,
    pub user_points: u64,
    pub user_level: u64,
    pub unlocked_badges: usize,
    pub achievements: usize,
    /// Length of the compact JSON serialization
    pub total_size_bytes: usize,
}

impl BackupStats {
    /// Total number of records across all domains
    pub fn total_records(&self) -> usize {
        self.workout_plans
            + self.exercises
            + self.workout_history
            + self.body_measurements
            + self.notes
            + self.nutrition_plans
            + self.food_items
            + self.daily_logs
            + self.unlocked_badges
            + self.achievements
    }

    /// Label/value rows for display
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Workout plans", self.workout_plans.to_string()),
            ("Exercises", self.exercises.to_string()),
            ("Workout history", self.workout_history.to_string()),
            ("Body measurements", self.body_measurements.to_string()),
            ("Notes", self.notes.to_string()),
            ("Nutrition plans", self.nutrition_plans.to_string()),
            ("Food items", self.food_items.to_string()),
            ("Daily logs", self.daily_logs.to_string()),
            ("Points", self.user_points.to_string()),
            ("Level", self.user_level.to_string()),
            ("Unlocked badges", self.unlocked_badges.to_string()),
            ("Achievements", self.achievements.to_string()),
            ("Size", format_size(self.total_size_bytes as u64)),
        ]
    }
}

/// Summarize a backup
pub fn backup_stats(backup: &Backup) -> BackupStats {
    let empty = DomainState::new();
    let workout = backup.data.workout.as_ref().unwrap_or(&empty);
    let nutrition = backup.data.nutrition.as_ref().unwrap_or(&empty);
    let gamification = backup.data.gamification.as_ref().unwrap_or(&empty);

    BackupStats {
        workout_plans: array_len(workout, "workoutPlans"),
        exercises: array_len(workout, "exercises"),
        workout_history: array_len(workout, "workoutHistory"),
        body_measurements: array_len(workout, "bodyMeasurements"),
        notes: array_len(workout, "notesHistory"),
        nutrition_plans: array_len(nutrition, "nutritionPlans"),
        food_items: array_len(nutrition, "foodItems"),
        daily_logs: array_len(nutrition, "dailyLogs"),
        user_points: counter(gamification, "userPoints"),
        user_level: counter(gamification, "userLevel"),
        unlocked_badges: gamification
            .get("badges")
            .and_then(Value::as_array)
            .map_or(0, |badges| badges.iter().filter(|b| is_unlocked(b)).count()),
        achievements: array_len(gamification, "achievements"),
        total_size_bytes: serde_json::to_string(backup).map_or(0, |json| json.len()),
    }
}

fn array_len(state: &DomainState, field: &str) -> usize {
    state.get(field).and_then(Value::as_array).map_or(0, Vec::len)
}

fn counter(state: &DomainState, field: &str) -> u64 {
    match state.get(field) {
        Some(value) => value
            .as_u64()
            .or_else(|| value.as_f64().filter(|v| *v > 0.0).map(|v| v as u64))
            .unwrap_or(0),
        None => 0,
    }
}

fn is_unlocked(badge: &Value) -> bool {
    badge.get("unlocked").and_then(Value::as_bool).unwrap_or(false)
        || badge.get("unlockedAt").is_some_and(|at| !at.is_null())
}

/// Format a byte count in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BackupData, Metadata};
    use serde_json::json;

    fn state(value: Value) -> Option<DomainState> {
        value.as_object().cloned()
    }

    #[test]
    fn test_empty_data_is_all_zero() {
        let backup = Backup {
            metadata: Metadata::default(),
            data: BackupData::default(),
        };

        let stats = backup_stats(&backup);
        assert_eq!(stats.total_records(), 0);
        assert_eq!(stats.user_points, 0);
        assert_eq!(stats.user_level, 0);
        assert!(stats.total_size_bytes > 0);
    }

    #[test]
    fn test_counts() {
        let backup = Backup {
            metadata: Metadata::default(),
            data: BackupData {
                workout: state(json!({
                    "workoutPlans": [{ "id": 1 }, { "id": 2 }],
                    "exercises": [{ "id": 1 }],
                    "workoutHistory": [{ "id": 1 }, { "id": 2 }, { "id": 3 }],
                    "bodyMeasurements": "broken"
                })),
                nutrition: state(json!({
                    "foodItems": [{ "id": "a" }],
                    "dailyLogs": [{ "id": "d1" }, { "id": "d2" }]
                })),
                gamification: state(json!({
                    "badges": [
                        { "id": "b1", "unlocked": true },
                        { "id": "b2", "unlocked": false },
                        { "id": "b3", "unlockedAt": "2024-01-01" },
                        { "id": "b4", "unlockedAt": null }
                    ],
                    "achievements": [{ "id": "a1" }],
                    "userPoints": 250,
                    "userLevel": 4.0
                })),
            },
        };

        let stats = backup_stats(&backup);
        assert_eq!(stats.workout_plans, 2);
        assert_eq!(stats.exercises, 1);
        assert_eq!(stats.workout_history, 3);
        assert_eq!(stats.body_measurements, 0);
        assert_eq!(stats.food_items, 1);
        assert_eq!(stats.daily_logs, 2);
        assert_eq!(stats.unlocked_badges, 2);
        assert_eq!(stats.achievements, 1);
        assert_eq!(stats.user_points, 250);
        assert_eq!(stats.user_level, 4);
        assert_eq!(
            stats.total_size_bytes,
            serde_json::to_string(&backup).unwrap().len()
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
