//! Backup validation
//!
//! Checks an arbitrary parsed document against the backup format and
//! collects structured issues. Two problems stop validation early: a root
//! that is not an object, and a missing `data` object. Everything else is
//! collected so the user sees the full list.

use std::collections::HashSet;
use std::fmt;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{BackupConfig, VersionPolicy};
use crate::error::BackupResult;
use crate::models::{has_name, id_key, record_id, Backup, Domain, FieldPolicy};

/// How much an issue counts against the backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the backup invalid
    Error,
    /// Reported, but the backup stays valid
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single problem found in a backup document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted location in the document, `$` for the root
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            severity,
            message: message.into(),
        }
    }

    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, Severity::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// True when no issue has `Error` severity
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub has_workout_data: bool,
    pub has_nutrition_data: bool,
    pub has_gamification_data: bool,
}

impl ValidationReport {
    fn finish(issues: Vec<ValidationIssue>, present: &[Domain]) -> Self {
        Self {
            is_valid: !issues.iter().any(ValidationIssue::is_error),
            has_workout_data: present.contains(&Domain::Workout),
            has_nutrition_data: present.contains(&Domain::Nutrition),
            has_gamification_data: present.contains(&Domain::Gamification),
            issues,
        }
    }

    /// Whether the document carries data for this domain
    pub fn has_domain(&self, domain: Domain) -> bool {
        match domain {
            Domain::Workout => self.has_workout_data,
            Domain::Nutrition => self.has_nutrition_data,
            Domain::Gamification => self.has_gamification_data,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// One-line verdict
    pub fn summary(&self) -> String {
        let present: Vec<&str> = Domain::ALL
            .iter()
            .filter(|d| self.has_domain(**d))
            .map(|d| d.data_key())
            .collect();
        let contents = if present.is_empty() {
            "no domain data".to_string()
        } else {
            present.join(", ")
        };

        let warnings = self.warnings().count();
        if self.is_valid && warnings == 0 {
            format!("Valid backup ({})", contents)
        } else if self.is_valid {
            format!("Valid backup ({}) with {} warning(s)", contents, warnings)
        } else {
            format!(
                "Invalid backup: {} error(s), {} warning(s)",
                self.errors().count(),
                warnings
            )
        }
    }
}

/// Validate an untyped document
pub fn validate_document(doc: &Value, config: &BackupConfig) -> ValidationReport {
    let mut issues = Vec::new();

    let root = match doc.as_object() {
        Some(root) => root,
        None => {
            issues.push(ValidationIssue::error("$", "Backup must be a JSON object"));
            return ValidationReport::finish(issues, &[]);
        }
    };

    let metadata = root.get("metadata").and_then(Value::as_object);
    if metadata.is_none() {
        let message = if root.contains_key("metadata") {
            "Backup metadata must be an object"
        } else {
            "Missing backup metadata"
        };
        issues.push(ValidationIssue::error("metadata", message));
    }

    let data = match root.get("data").and_then(Value::as_object) {
        Some(data) => data,
        None => {
            let message = if root.contains_key("data") {
                "Backup data must be an object"
            } else {
                "Missing backup data"
            };
            issues.push(ValidationIssue::error("data", message));
            return ValidationReport::finish(issues, &[]);
        }
    };

    let mut present = Vec::new();
    for domain in Domain::ALL {
        match data.get(domain.data_key()) {
            None | Some(Value::Null) => {}
            Some(value) => {
                present.push(domain);
                validate_domain(domain, value, &mut issues);
            }
        }
    }

    if let Some(metadata) = metadata {
        check_metadata_fields(metadata, &mut issues);
    }
    check_version(metadata, config, &mut issues);

    ValidationReport::finish(issues, &present)
}

/// Validate a typed backup through its serialized form
pub fn validate_backup(backup: &Backup, config: &BackupConfig) -> BackupResult<ValidationReport> {
    Ok(validate_document(&backup.to_value()?, config))
}

/// Header fields must have the types the typed decode expects
fn check_metadata_fields(metadata: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    for name in ["appVersion", "createdBy", "description"] {
        if let Some(field) = metadata.get(name) {
            if !field.is_string() {
                issues.push(ValidationIssue::error(
                    format!("metadata.{}", name),
                    format!("Field '{}' must be a string", name),
                ));
            }
        }
    }

    if let Some(field) = metadata.get("createdAt") {
        let parses = field
            .as_str()
            .is_some_and(|text| DateTime::parse_from_rfc3339(text).is_ok());
        if !parses {
            issues.push(ValidationIssue::error(
                "metadata.createdAt",
                "Field 'createdAt' must be an RFC 3339 timestamp",
            ));
        }
    }
}

fn check_version(
    metadata: Option<&Map<String, Value>>,
    config: &BackupConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let raw = metadata.and_then(|m| m.get("version"));
    if raw.is_some_and(|v| !v.is_string()) {
        issues.push(ValidationIssue::error(
            "metadata.version",
            "Field 'version' must be a string",
        ));
        return;
    }

    let found = raw.and_then(Value::as_str);
    if found == Some(config.format_version.as_str()) {
        return;
    }

    let severity = match config.version_policy {
        VersionPolicy::Strict => Severity::Error,
        VersionPolicy::Lenient => Severity::Warning,
    };
    let message = match found {
        Some(version) => format!(
            "Version mismatch: backup is version {}, expected {}",
            version, config.format_version
        ),
        None => format!(
            "Missing backup version, expected {}",
            config.format_version
        ),
    };
    issues.push(ValidationIssue::new("metadata.version", severity, message));
}

fn validate_domain(domain: Domain, value: &Value, issues: &mut Vec<ValidationIssue>) {
    let base = format!("data.{}", domain.data_key());

    let state = match value.as_object() {
        Some(state) => state,
        None => {
            issues.push(ValidationIssue::error(
                base,
                format!("{} must be an object", domain.label()),
            ));
            return;
        }
    };

    for spec in domain.fields() {
        let Some(field) = state.get(spec.name) else {
            continue;
        };
        let path = format!("{}.{}", base, spec.name);

        if spec.policy.is_record_array() {
            validate_records(&path, spec.name, spec.policy, field, issues);
            continue;
        }

        match spec.policy {
            FieldPolicy::Settings | FieldPolicy::Streaks => {
                if !field.is_object() && !field.is_null() {
                    issues.push(ValidationIssue::error(
                        path,
                        format!("Field '{}' must be an object", spec.name),
                    ));
                }
            }
            FieldPolicy::Counter => {
                if !field.is_number() && !field.is_null() {
                    issues.push(ValidationIssue::error(
                        path,
                        format!("Field '{}' must be a number", spec.name),
                    ));
                }
            }
            FieldPolicy::NamedRecords | FieldPolicy::Records => {}
        }
    }
}

fn validate_records(
    path: &str,
    name: &str,
    policy: FieldPolicy,
    field: &Value,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(records) = field.as_array() else {
        issues.push(ValidationIssue::error(
            path,
            format!("Field '{}' must be an array", name),
        ));
        return;
    };

    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        let record_path = format!("{}[{}]", path, index);

        if !record.is_object() {
            issues.push(ValidationIssue::error(
                record_path,
                format!("Record at index {} in '{}' must be an object", index, name),
            ));
            continue;
        }

        match record_id(record) {
            Some(id) => {
                if !seen.insert(id_key(id)) {
                    issues.push(ValidationIssue::error(
                        record_path.clone(),
                        format!("Record at index {} in '{}' has duplicate id {}", index, name, id),
                    ));
                }
            }
            None => issues.push(ValidationIssue::error(
                record_path.clone(),
                format!("Record at index {} in '{}' is missing an id", index, name),
            )),
        }

        if policy.requires_name() && !has_name(record) {
            issues.push(ValidationIssue::error(
                record_path,
                format!("Record at index {} in '{}' is missing a name", index, name),
            ));
        }
    }
}
