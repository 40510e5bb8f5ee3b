//! Device-local state kept outside the shared database: unlocked
//! achievements, dismissed tips, recent actions and custom CO2 factors.
//!
//! The on-disk format is a versioned JSON document. Older versions are
//! migrated on load; documents written by a newer version are refused rather
//! than silently truncated.

use crate::error::{DashboardError, DashboardResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const LOCAL_STATE_VERSION: u32 = 2;
pub const MAX_ACTION_HISTORY: usize = 50;
pub const DEFAULT_STORE_PATH: &str = "eco_dashboard_state.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub at: DateTime<Utc>,
    pub school_id: Option<i64>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalState {
    pub version: u32,
    /// Achievement ids per school id
    #[serde(default)]
    pub unlocked_achievements: BTreeMap<i64, Vec<String>>,
    #[serde(default)]
    pub dismissed_tips: Vec<String>,
    /// Most recent last
    #[serde(default)]
    pub action_history: Vec<ActionRecord>,
    #[serde(default)]
    pub custom_factors: BTreeMap<String, f64>,
}

impl Default for LocalState {
    fn default() -> Self {
        LocalState {
            version: LOCAL_STATE_VERSION,
            unlocked_achievements: BTreeMap::new(),
            dismissed_tips: Vec::new(),
            action_history: Vec::new(),
            custom_factors: BTreeMap::new(),
        }
    }
}

impl LocalState {
    pub fn unlocked_for(&self, school_id: i64) -> &[String] {
        self.unlocked_achievements
            .get(&school_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records ids not already unlocked; returns how many were new
    pub fn unlock(&mut self, school_id: i64, ids: &[&str]) -> usize {
        let unlocked = self.unlocked_achievements.entry(school_id).or_default();
        let mut added = 0;
        for id in ids {
            if !unlocked.iter().any(|existing| existing == id) {
                unlocked.push(id.to_string());
                added += 1;
            }
        }
        added
    }

    pub fn dismiss_tip(&mut self, tip_id: &str) {
        if !self.dismissed_tips.iter().any(|id| id == tip_id) {
            self.dismissed_tips.push(tip_id.to_string());
        }
    }

    pub fn record_action(
        &mut self,
        at: DateTime<Utc>,
        school_id: Option<i64>,
        description: impl Into<String>,
    ) {
        self.action_history.push(ActionRecord {
            at,
            school_id,
            description: description.into(),
        });
        if self.action_history.len() > MAX_ACTION_HISTORY {
            let overflow = self.action_history.len() - MAX_ACTION_HISTORY;
            self.action_history.drain(..overflow);
        }
    }

    pub fn to_json(&self) -> DashboardResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DashboardError::Store(e.to_string()))
    }

    /// Parses a stored document, migrating older versions
    pub fn from_json(text: &str) -> DashboardResult<Self> {
        let mut value: Value =
            serde_json::from_str(text).map_err(|e| DashboardError::Store(e.to_string()))?;
        let Value::Object(map) = &mut value else {
            return Err(DashboardError::Store(
                "local state must be a JSON object".to_string(),
            ));
        };

        // Version 1 documents carried no version field
        let version = match map.get("version") {
            None => 1,
            Some(raw) => raw
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    DashboardError::Store(format!("local state version {} is not valid", raw))
                })?,
        };

        if version > LOCAL_STATE_VERSION {
            return Err(DashboardError::Store(format!(
                "local state version {} is newer than supported version {}",
                version, LOCAL_STATE_VERSION
            )));
        }

        if version == 1 {
            // v1 kept dismissed tips under "dismissed"
            if let Some(dismissed) = map.remove("dismissed") {
                map.insert("dismissed_tips".to_string(), dismissed);
            }
            map.insert("version".to_string(), Value::from(LOCAL_STATE_VERSION));
            info!("Migrated local state from version 1 to {}", LOCAL_STATE_VERSION);
        }

        serde_json::from_value(value).map_err(|e| DashboardError::Store(e.to_string()))
    }
}

/// Injected persistence for [`LocalState`]
pub trait LocalStore: Send + Sync {
    fn load(&self) -> DashboardResult<LocalState>;
    fn save(&self, state: &LocalState) -> DashboardResult<()>;
}

/// JSON file on disk. A missing file reads as the default state.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LocalStore for JsonFileStore {
    fn load(&self) -> DashboardResult<LocalState> {
        if !self.path.exists() {
            debug!("No local state at {}, using defaults", self.path.display());
            return Ok(LocalState::default());
        }
        let text = fs::read_to_string(&self.path)?;
        LocalState::from_json(&text)
    }

    fn save(&self, state: &LocalState) -> DashboardResult<()> {
        fs::write(&self.path, state.to_json()?)?;
        debug!("Saved local state to {}", self.path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<LocalState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn load(&self) -> DashboardResult<LocalState> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| DashboardError::Store(e.to_string()))
    }

    fn save(&self, state: &LocalState) -> DashboardResult<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| DashboardError::Store(e.to_string()))?;
        *guard = state.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, minute % 60, 0).unwrap()
    }

    #[test]
    fn test_default_state_has_current_version() {
        assert_eq!(LocalState::default().version, LOCAL_STATE_VERSION);
    }

    #[test]
    fn test_unlock_is_idempotent_per_school() {
        let mut state = LocalState::default();
        assert_eq!(state.unlock(1, &["first_entry", "goal_setter"]), 2);
        assert_eq!(state.unlock(1, &["first_entry"]), 0);
        assert_eq!(state.unlock(2, &["first_entry"]), 1);
        assert_eq!(state.unlocked_for(1).len(), 2);
        assert!(state.unlocked_for(3).is_empty());
    }

    #[test]
    fn test_action_history_is_capped() {
        let mut state = LocalState::default();
        for i in 0..(MAX_ACTION_HISTORY + 5) {
            state.record_action(at(i as u32), Some(1), format!("action {}", i));
        }
        assert_eq!(state.action_history.len(), MAX_ACTION_HISTORY);
        assert_eq!(state.action_history[0].description, "action 5");
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = LocalState::default();
        state.unlock(3, &["first_entry"]);
        state.dismiss_tip("fix_leaks");
        state.dismiss_tip("fix_leaks");
        state.custom_factors.insert("isopor".to_string(), 2.5);
        state.record_action(at(0), None, "Added school");

        let restored = LocalState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.dismissed_tips.len(), 1);
    }

    #[test]
    fn test_migrates_version_one() {
        let v1 = r#"{"dismissed": ["standby"], "unlocked_achievements": {"1": ["first_entry"]}}"#;
        let state = LocalState::from_json(v1).unwrap();
        assert_eq!(state.version, LOCAL_STATE_VERSION);
        assert_eq!(state.dismissed_tips, vec!["standby".to_string()]);
        assert_eq!(state.unlocked_for(1), ["first_entry".to_string()]);
        assert!(state.custom_factors.is_empty());
    }

    #[test]
    fn test_rejects_newer_version() {
        let future = r#"{"version": 99}"#;
        assert!(matches!(
            LocalState::from_json(future),
            Err(DashboardError::Store(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_version() {
        for raw in ["4294967298", "-1", "\"2\"", "1.5"] {
            let doc = format!(r#"{{"version": {}}}"#, raw);
            assert!(
                matches!(LocalState::from_json(&doc), Err(DashboardError::Store(_))),
                "accepted version {}",
                raw
            );
        }
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(LocalState::from_json("[1, 2]").is_err());
        assert!(LocalState::from_json("not json").is_err());
    }

    #[test]
    fn test_file_store_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().unwrap(), LocalState::default());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        let mut state = LocalState::default();
        state.dismiss_tip("rainwater");
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        let mut state = store.load().unwrap();
        state.dismiss_tip("standby");
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap().dismissed_tips, vec!["standby".to_string()]);
    }
}
