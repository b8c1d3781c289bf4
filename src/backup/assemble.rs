//! Backup assembly
//!
//! Reads the three domain stores and produces a fully populated backup.
//! Assembly never fails: anything unreadable becomes an empty domain.

use chrono::Utc;
use log::{info, warn};
use serde_json::Value;

use crate::config::BackupConfig;
use crate::models::{Backup, BackupData, Domain, DomainState, Metadata};
use crate::storage::KeyValueStore;

/// Snapshot the current contents of the domain stores
pub fn assemble_backup(store: &dyn KeyValueStore, config: &BackupConfig) -> Backup {
    assemble_with_description(store, config, &config.description)
}

/// Like `assemble_backup`, with a custom description
pub fn assemble_with_description(
    store: &dyn KeyValueStore,
    config: &BackupConfig,
    description: &str,
) -> Backup {
    let workout = read_domain(store, Domain::Workout);
    let nutrition = read_domain(store, Domain::Nutrition);
    let gamification = read_domain(store, Domain::Gamification);

    let created_by = profile_name(&workout).unwrap_or_else(|| config.fallback_author.clone());

    info!(
        "Assembled backup for {} ({} workout, {} nutrition, {} gamification fields)",
        created_by,
        workout.len(),
        nutrition.len(),
        gamification.len()
    );

    Backup {
        metadata: Metadata {
            version: config.format_version.clone(),
            app_version: config.app_version.clone(),
            created_at: Utc::now(),
            created_by,
            description: description.to_string(),
        },
        data: BackupData {
            workout: Some(workout),
            nutrition: Some(nutrition),
            gamification: Some(gamification),
        },
    }
}

/// Read one domain store, defaulting to an empty object
pub(crate) fn read_domain(store: &dyn KeyValueStore, domain: Domain) -> DomainState {
    let key = domain.storage_key();

    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return DomainState::new(),
        Err(e) => {
            warn!("Could not read {}, treating as empty: {}", key, e);
            return DomainState::new();
        }
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => DomainState::new(),
        Ok(_) => {
            warn!("{} is not a JSON object, treating as empty", key);
            DomainState::new()
        }
        Err(e) => {
            warn!("{} is not valid JSON, treating as empty: {}", key, e);
            DomainState::new()
        }
    }
}

fn profile_name(workout: &DomainState) -> Option<String> {
    workout
        .get("userProfile")
        .and_then(|profile| profile.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
