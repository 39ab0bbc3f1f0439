use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

/// Local identity. A profile without a player name means guest mode, in
/// which score persistence is skipped entirely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub player_name: Option<String>,
    pub total_tests: u32,
    pub best_score: u32,
    pub last_test_date: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            player_name: None,
            total_tests: 0,
            best_score: 0,
            last_test_date: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn display_name(&self) -> &str {
        self.player_name.as_deref().unwrap_or("Guest")
    }
}

/// One persisted finished-session summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub industry: String,
    pub category: String,
    pub difficulty: String,
    pub score_percent: u32,
    pub correct_count: u32,
    pub total_questions: u32,
    pub time_taken_secs: u64,
    /// Which flow produced the record ("test"); practice rounds never reach
    /// the store.
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreHistoryData {
    pub schema_version: u32,
    pub records: Vec<ScoreRecord>,
}

impl Default for ScoreHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records: Vec::new(),
        }
    }
}

impl ScoreHistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_guest() {
        let profile = ProfileData::default();
        assert!(!profile.needs_reset());
        assert_eq!(profile.display_name(), "Guest");
    }

    #[test]
    fn test_stale_schema_flags_reset() {
        let history = ScoreHistoryData {
            schema_version: 99,
            records: Vec::new(),
        };
        assert!(history.needs_reset());
    }
}
