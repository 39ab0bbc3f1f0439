use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One multiple-choice question. Immutable once loaded from the bank.
///
/// `options` maps option key ("A".."D") to option text; a BTreeMap keeps
/// display order stable regardless of JSON key order. `category` is the
/// display tag copied into answer records, independent of the pool the
/// question was loaded from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: BTreeMap<String, String>,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_correct(&self, option_key: &str) -> bool {
        self.answer == option_key
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

pub const ALL_DIFFICULTIES: [Difficulty; 3] =
    [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Per-question time allowance in seconds.
    pub fn seconds_per_question(self) -> u32 {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 45,
            Difficulty::Hard => 60,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Logical,
    Numerical,
    Verbal,
}

pub const ALL_CATEGORIES: [Category; 4] = [
    Category::General,
    Category::Logical,
    Category::Numerical,
    Category::Verbal,
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Logical => "Logical",
            Category::Numerical => "Numerical",
            Category::Verbal => "Verbal",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Logical => "logical",
            Category::Numerical => "numerical",
            Category::Verbal => "verbal",
        }
    }
}

/// A category filter: one canonical category, or the union of all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryChoice {
    Mixed,
    Single(Category),
}

impl CategoryChoice {
    /// Normalize a category tag, accepting known synonyms and misspellings.
    /// Unrecognized tags yield `None`; the selector turns that into an empty
    /// result rather than an error.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "general" => Some(CategoryChoice::Single(Category::General)),
            "logical" => Some(CategoryChoice::Single(Category::Logical)),
            // "numerial" is a legacy misspelling found in saved selections
            "numerical" | "numerial" => Some(CategoryChoice::Single(Category::Numerical)),
            "verbal" => Some(CategoryChoice::Single(Category::Verbal)),
            "mix" | "mixed" => Some(CategoryChoice::Mixed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryChoice::Mixed => "Mixed",
            CategoryChoice::Single(cat) => cat.as_str(),
        }
    }

    /// The concrete categories this choice expands to.
    pub fn categories(self) -> Vec<Category> {
        match self {
            CategoryChoice::Mixed => ALL_CATEGORIES.to_vec(),
            CategoryChoice::Single(cat) => vec![cat],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_allowances() {
        assert_eq!(Difficulty::Easy.seconds_per_question(), 30);
        assert_eq!(Difficulty::Medium.seconds_per_question(), 45);
        assert_eq!(Difficulty::Hard.seconds_per_question(), 60);
    }

    #[test]
    fn test_difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("impossible"), None);
    }

    #[test]
    fn test_category_synonyms_normalize() {
        assert_eq!(
            CategoryChoice::parse("numerial"),
            Some(CategoryChoice::Single(Category::Numerical))
        );
        assert_eq!(CategoryChoice::parse("mix"), Some(CategoryChoice::Mixed));
        assert_eq!(CategoryChoice::parse("MIXED"), Some(CategoryChoice::Mixed));
        assert_eq!(CategoryChoice::parse("spatial"), None);
    }

    #[test]
    fn test_mixed_expands_to_all_categories() {
        assert_eq!(CategoryChoice::Mixed.categories(), ALL_CATEGORIES.to_vec());
        assert_eq!(
            CategoryChoice::Single(Category::Verbal).categories(),
            vec![Category::Verbal]
        );
    }

    #[test]
    fn test_question_deserializes_bank_format() {
        let json = r#"{
            "id": "edu-gen-e1",
            "question": "Which number completes the sequence 2, 4, 8, 16, ...?",
            "options": {"A": "24", "B": "32", "C": "30", "D": "20"},
            "answer": "B",
            "category": "General"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, "edu-gen-e1");
        assert_eq!(q.options.len(), 4);
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("A"));
        assert!(q.explanation.is_none());
    }
}
