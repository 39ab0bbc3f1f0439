use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::store::schema::{ProfileData, ScoreHistoryData, ScoreRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The persistence boundary for finished-session results. The session core
/// only calls this; where the records actually land is the gateway's
/// business.
pub trait ScoreGateway {
    /// Append one finished-session record.
    fn append_score(&self, record: ScoreRecord) -> Result<(), StoreError>;

    /// The most recent `limit` records, newest first. Read failures degrade
    /// to an empty history.
    fn recent_scores(&self, limit: usize) -> Vec<ScoreRecord>;
}

/// Gateway backed by JSON files in the platform data directory.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self, StoreError> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    /// Atomic write: tmp file, fsync, rename over the target.
    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<(), StoreError> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load the profile. Returns None if the file exists but cannot be
    /// parsed (schema mismatch / corruption); a missing file is a fresh
    /// default, not an error.
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path("profile.json");
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            Some(ProfileData::default())
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<(), StoreError> {
        self.save("profile.json", data)
    }

    fn load_history(&self) -> ScoreHistoryData {
        let history: ScoreHistoryData = self.load("scores.json");
        if history.needs_reset() {
            ScoreHistoryData::default()
        } else {
            history
        }
    }
}

impl ScoreGateway for JsonStore {
    fn append_score(&self, record: ScoreRecord) -> Result<(), StoreError> {
        let mut history = self.load_history();
        history.records.push(record);
        self.save("scores.json", &history)
    }

    fn recent_scores(&self, limit: usize) -> Vec<ScoreRecord> {
        let history = self.load_history();
        // records are appended chronologically; newest first for display
        history.records.into_iter().rev().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn record(score: u32, hour: u32) -> ScoreRecord {
        ScoreRecord {
            player: "Ada".to_string(),
            industry: "Education".to_string(),
            category: "Mixed".to_string(),
            difficulty: "Easy".to_string(),
            score_percent: score,
            correct_count: score / 10,
            total_questions: 10,
            time_taken_secs: 120,
            source: "test".to_string(),
            recorded_at: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_append_then_recent_newest_first() {
        let (_dir, store) = make_test_store();
        store.append_score(record(40, 9)).unwrap();
        store.append_score(record(70, 10)).unwrap();
        store.append_score(record(90, 11)).unwrap();

        let recent = store.recent_scores(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].score_percent, 90);
        assert_eq!(recent[1].score_percent, 70);
    }

    #[test]
    fn test_recent_on_empty_store_is_empty() {
        let (_dir, store) = make_test_store();
        assert!(store.recent_scores(5).is_empty());
    }

    #[test]
    fn test_corrupt_history_degrades_to_empty() {
        let (_dir, store) = make_test_store();
        std::fs::write(store.file_path("scores.json"), "{not json").unwrap();
        assert!(store.recent_scores(5).is_empty());
        // appending after corruption starts a fresh history
        store.append_score(record(55, 8)).unwrap();
        assert_eq!(store.recent_scores(5).len(), 1);
    }

    #[test]
    fn test_stale_history_schema_resets() {
        let (_dir, store) = make_test_store();
        std::fs::write(
            store.file_path("scores.json"),
            r#"{"schema_version": 99, "records": []}"#,
        )
        .unwrap();
        store.append_score(record(80, 12)).unwrap();
        let recent = store.recent_scores(5);
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_profile_roundtrip() {
        let (_dir, store) = make_test_store();
        let mut profile = ProfileData::default();
        profile.player_name = Some("Ada".to_string());
        profile.total_tests = 3;
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile().unwrap();
        assert_eq!(loaded.player_name.as_deref(), Some("Ada"));
        assert_eq!(loaded.total_tests, 3);
    }

    #[test]
    fn test_unparseable_profile_is_none() {
        let (_dir, store) = make_test_store();
        std::fs::write(store.file_path("profile.json"), "garbage").unwrap();
        assert!(store.load_profile().is_none());
    }

    #[test]
    fn test_missing_profile_is_fresh_default() {
        let (_dir, store) = make_test_store();
        let profile = store.load_profile().unwrap();
        assert_eq!(profile.total_tests, 0);
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let (dir, store) = make_test_store();
        store.append_score(record(60, 7)).unwrap();
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
