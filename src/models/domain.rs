//! The three data domains and their field-policy tables
//!
//! Domain states stay as JSON objects so unknown fields round-trip. What the
//! pipeline knows about each domain lives in the static tables below, and
//! both validation and merging are driven from them.

use std::fmt;

use serde_json::{Map, Value};

use crate::storage::{GAMIFICATION_STATE_KEY, NUTRITION_STATE_KEY, WORKOUT_STATE_KEY};

/// One domain's state as stored under its key
pub type DomainState = Map<String, Value>;

/// How a known field is validated and merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Array of records, each with `id` and `name`
    NamedRecords,
    /// Array of records, each with `id`
    Records,
    /// Configuration object, shallow-merged with backup winning
    Settings,
    /// Monotonic number, merged as max
    Counter,
    /// Streak object; maxima fields are merged as max
    Streaks,
}

impl FieldPolicy {
    /// Field must be an array of id-bearing records
    pub fn is_record_array(self) -> bool {
        matches!(self, Self::NamedRecords | Self::Records)
    }

    /// Records in the array also need a human-readable name
    pub fn requires_name(self) -> bool {
        matches!(self, Self::NamedRecords)
    }
}

/// A known field of a domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub policy: FieldPolicy,
}

const fn field(name: &'static str, policy: FieldPolicy) -> FieldSpec {
    FieldSpec { name, policy }
}

const WORKOUT_FIELDS: &[FieldSpec] = &[
    field("workoutPlans", FieldPolicy::NamedRecords),
    field("exercises", FieldPolicy::NamedRecords),
    field("workoutHistory", FieldPolicy::Records),
    field("bodyMeasurements", FieldPolicy::Records),
    field("notesHistory", FieldPolicy::Records),
    field("userProfile", FieldPolicy::Settings),
];

const NUTRITION_FIELDS: &[FieldSpec] = &[
    field("nutritionPlans", FieldPolicy::NamedRecords),
    field("foodItems", FieldPolicy::NamedRecords),
    field("dailyLogs", FieldPolicy::Records),
    field("nutritionGoals", FieldPolicy::Settings),
];

const GAMIFICATION_FIELDS: &[FieldSpec] = &[
    field("badges", FieldPolicy::NamedRecords),
    field("achievements", FieldPolicy::NamedRecords),
    field("challenges", FieldPolicy::NamedRecords),
    field("userPoints", FieldPolicy::Counter),
    field("userLevel", FieldPolicy::Counter),
    field("streaks", FieldPolicy::Streaks),
];

/// One of the three independently persisted data partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Workout,
    Nutrition,
    Gamification,
}

impl Domain {
    /// All domains, in restore order
    pub const ALL: [Domain; 3] = [Domain::Workout, Domain::Nutrition, Domain::Gamification];

    /// Key of this domain inside a backup's `data` object
    pub fn data_key(self) -> &'static str {
        match self {
            Domain::Workout => "workout",
            Domain::Nutrition => "nutrition",
            Domain::Gamification => "gamification",
        }
    }

    /// Key of the live domain store
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Workout => WORKOUT_STATE_KEY,
            Domain::Nutrition => NUTRITION_STATE_KEY,
            Domain::Gamification => GAMIFICATION_STATE_KEY,
        }
    }

    /// Human-readable name used in restore reports
    pub fn label(self) -> &'static str {
        match self {
            Domain::Workout => "Workout data",
            Domain::Nutrition => "Nutrition data",
            Domain::Gamification => "Gamification data",
        }
    }

    /// Known fields of this domain
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Domain::Workout => WORKOUT_FIELDS,
            Domain::Nutrition => NUTRITION_FIELDS,
            Domain::Gamification => GAMIFICATION_FIELDS,
        }
    }

    /// Policy of a field, `None` for fields outside the table
    pub fn policy_of(self, field: &str) -> Option<FieldPolicy> {
        self.fields()
            .iter()
            .find(|spec| spec.name == field)
            .map(|spec| spec.policy)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_key())
    }
}

/// Streak fields that only ever grow
pub fn is_streak_maximum(field: &str) -> bool {
    field.starts_with("longest") || field.starts_with("max") || field.starts_with("best")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(Domain::Workout.storage_key(), "workoutState");
        assert_eq!(Domain::Nutrition.storage_key(), "nutritionState");
        assert_eq!(Domain::Gamification.storage_key(), "gamificationState");
    }

    #[test]
    fn test_policy_lookup() {
        assert_eq!(
            Domain::Workout.policy_of("exercises"),
            Some(FieldPolicy::NamedRecords)
        );
        assert_eq!(
            Domain::Nutrition.policy_of("dailyLogs"),
            Some(FieldPolicy::Records)
        );
        assert_eq!(
            Domain::Gamification.policy_of("userPoints"),
            Some(FieldPolicy::Counter)
        );
        assert_eq!(Domain::Workout.policy_of("theme"), None);
    }

    #[test]
    fn test_streak_maxima() {
        assert!(is_streak_maximum("longestWorkoutStreak"));
        assert!(is_streak_maximum("maxStreak"));
        assert!(!is_streak_maximum("currentStreak"));
        assert!(!is_streak_maximum("lastActivityDate"));
    }
}
