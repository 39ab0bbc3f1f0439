use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bank::question::{CategoryChoice, Difficulty};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_industry")]
    pub default_industry: String,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_difficulty")]
    pub default_difficulty: String,
    /// How many past scores the history screen shows.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_industry() -> String {
    "Education".to_string()
}
fn default_category() -> String {
    "Mixed".to_string()
}
fn default_difficulty() -> String {
    "Easy".to_string()
}
fn default_history_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_industry: default_industry(),
            default_category: default_category(),
            default_difficulty: default_difficulty(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    /// Reset unparseable category/difficulty tags to the defaults. Call
    /// after deserialization so stale values from old configs can't leave
    /// the start screen with a filter nothing matches.
    pub fn normalize_filters(&mut self) {
        if CategoryChoice::parse(&self.default_category).is_none() {
            self.default_category = default_category();
        }
        if Difficulty::parse(&self.default_difficulty).is_none() {
            self.default_difficulty = default_difficulty();
        }
        if self.history_limit == 0 {
            self.history_limit = default_history_limit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default_industry, "Education");
        assert_eq!(config.default_category, "Mixed");
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn test_config_serde_defaults_from_partial_file() {
        let toml_str = r#"
theme = "monokai"
default_difficulty = "Hard"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "monokai");
        assert_eq!(config.default_difficulty, "Hard");
        assert_eq!(config.default_category, "Mixed");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.default_category, deserialized.default_category);
        assert_eq!(config.history_limit, deserialized.history_limit);
    }

    #[test]
    fn test_normalize_filters_resets_unknown_tags() {
        let mut config = Config::default();
        config.default_category = "spatial".to_string();
        config.default_difficulty = "brutal".to_string();
        config.history_limit = 0;
        config.normalize_filters();
        assert_eq!(config.default_category, "Mixed");
        assert_eq!(config.default_difficulty, "Easy");
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn test_normalize_filters_accepts_synonyms() {
        let mut config = Config::default();
        config.default_category = "numerial".to_string();
        config.normalize_filters();
        // synonym parses, so it is left as-is for the selector to normalize
        assert_eq!(config.default_category, "numerial");
    }
}
