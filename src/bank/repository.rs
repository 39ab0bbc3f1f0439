use std::collections::HashMap;

use rust_embed::Embed;

use crate::bank::question::{Category, Difficulty, Question};

#[derive(Embed)]
#[folder = "assets/questions/"]
struct BankAssets;

type PoolKey = (String, Category, Difficulty);

/// The static question repository: every bundled question, pre-partitioned by
/// (industry, category, difficulty) and loaded wholesale at startup.
pub struct QuestionBank {
    pools: HashMap<PoolKey, Vec<Question>>,
    load_warnings: Vec<String>,
}

impl QuestionBank {
    /// Parse all embedded bank files. A file that fails to parse (or has an
    /// unrecognized path) contributes zero questions and a warning; loading
    /// never fails outright.
    pub fn load() -> Self {
        let mut pools: HashMap<PoolKey, Vec<Question>> = HashMap::new();
        let mut load_warnings = Vec::new();

        for path in BankAssets::iter() {
            let Some(key) = parse_asset_path(&path) else {
                load_warnings.push(format!("unrecognized bank file: {path}"));
                continue;
            };
            // iter() only yields paths that exist in the embed
            let Some(file) = BankAssets::get(&path) else {
                continue;
            };
            match serde_json::from_slice::<Vec<Question>>(file.data.as_ref()) {
                Ok(questions) => {
                    pools.entry(key).or_default().extend(questions);
                }
                Err(err) => {
                    load_warnings.push(format!("malformed bank file {path}: {err}"));
                }
            }
        }

        Self {
            pools,
            load_warnings,
        }
    }

    pub fn empty() -> Self {
        Self {
            pools: HashMap::new(),
            load_warnings: Vec::new(),
        }
    }

    /// Insert a pool directly. Test constructor; bypasses the embedded assets.
    pub fn insert_pool(
        &mut self,
        industry: &str,
        category: Category,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) {
        self.pools
            .entry((industry.to_lowercase(), category, difficulty))
            .or_default()
            .extend(questions);
    }

    pub fn pool(
        &self,
        industry: &str,
        category: Category,
        difficulty: Difficulty,
    ) -> Option<&[Question]> {
        self.pools
            .get(&(industry.to_lowercase(), category, difficulty))
            .map(Vec::as_slice)
    }

    /// Known industries, sorted, with display capitalization.
    pub fn industries(&self) -> Vec<String> {
        let mut industries: Vec<String> = self
            .pools
            .keys()
            .map(|(industry, _, _)| capitalize(industry))
            .collect();
        industries.sort();
        industries.dedup();
        industries
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn total_questions(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }
}

/// Bank files live at `<industry>/<category>-<difficulty>.json`.
fn parse_asset_path(path: &str) -> Option<PoolKey> {
    let (industry, file) = path.split_once('/')?;
    let stem = file.strip_suffix(".json")?;
    let (category_key, difficulty_key) = stem.rsplit_once('-')?;
    let category = match category_key {
        "general" => Category::General,
        "logical" => Category::Logical,
        "numerical" => Category::Numerical,
        "verbal" => Category::Verbal,
        _ => return None,
    };
    let difficulty = Difficulty::parse(difficulty_key)?;
    Some((industry.to_lowercase(), category, difficulty))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset_path() {
        assert_eq!(
            parse_asset_path("education/general-easy.json"),
            Some((
                "education".to_string(),
                Category::General,
                Difficulty::Easy
            ))
        );
        assert_eq!(
            parse_asset_path("education/numerical-hard.json"),
            Some((
                "education".to_string(),
                Category::Numerical,
                Difficulty::Hard
            ))
        );
        assert_eq!(parse_asset_path("education/spatial-easy.json"), None);
        assert_eq!(parse_asset_path("notes.txt"), None);
    }

    #[test]
    fn test_bundled_bank_loads_cleanly() {
        let bank = QuestionBank::load();
        assert!(
            bank.load_warnings().is_empty(),
            "bundled bank has warnings: {:?}",
            bank.load_warnings()
        );
        assert!(bank.total_questions() > 0);
        assert_eq!(bank.industries(), vec!["Education".to_string()]);
    }

    #[test]
    fn test_every_bundled_cell_is_present() {
        let bank = QuestionBank::load();
        for category in crate::bank::question::ALL_CATEGORIES {
            for difficulty in crate::bank::question::ALL_DIFFICULTIES {
                let pool = bank.pool("Education", category, difficulty);
                assert!(
                    pool.is_some_and(|p| !p.is_empty()),
                    "missing pool {category:?}/{difficulty:?}"
                );
            }
        }
    }

    #[test]
    fn test_bundled_answers_reference_existing_options() {
        let bank = QuestionBank::load();
        for category in crate::bank::question::ALL_CATEGORIES {
            for difficulty in crate::bank::question::ALL_DIFFICULTIES {
                for q in bank.pool("education", category, difficulty).unwrap_or_default() {
                    assert!(
                        q.options.contains_key(&q.answer),
                        "question {} has answer key {} not in options",
                        q.id,
                        q.answer
                    );
                }
            }
        }
    }

    #[test]
    fn test_pool_lookup_is_case_insensitive_on_industry() {
        let mut bank = QuestionBank::empty();
        bank.insert_pool("Education", Category::Verbal, Difficulty::Easy, vec![]);
        assert!(bank.pool("EDUCATION", Category::Verbal, Difficulty::Easy).is_some());
        assert!(bank.pool("finance", Category::Verbal, Difficulty::Easy).is_none());
    }
}
