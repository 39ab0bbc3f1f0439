use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::bank::question::{CategoryChoice, Difficulty, Question};
use crate::bank::repository::QuestionBank;

/// Tests present at most this many questions, in shuffled order.
pub const SAMPLE_SIZE: usize = 10;

/// Filter for one selection pass. Category and difficulty are raw tags so
/// synonym normalization happens inside `select`, matching how saved and
/// user-entered values arrive.
#[derive(Clone, Debug)]
pub struct SelectionCriteria {
    pub industries: Vec<String>,
    pub category: String,
    pub difficulty: String,
    /// Restrict the matched pool to exactly these question ids (retest mode).
    /// Ids absent from the pool silently shrink the result.
    pub ids: Option<HashSet<String>>,
    /// Skip sampling and return the whole matched pool.
    pub take_all: bool,
}

impl SelectionCriteria {
    pub fn new(industries: Vec<String>, category: &str, difficulty: &str) -> Self {
        Self {
            industries,
            category: category.to_string(),
            difficulty: difficulty.to_string(),
            ids: None,
            take_all: false,
        }
    }

    pub fn with_ids(mut self, ids: HashSet<String>) -> Self {
        self.ids = Some(ids);
        self
    }
}

/// Selection outcome. `warnings` lists every (industry, category, difficulty)
/// cell that contributed nothing; the caller decides whether to surface them.
/// An empty `questions` is a valid outcome, never an error.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub questions: Vec<Question>,
    pub warnings: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

pub fn select(bank: &QuestionBank, criteria: &SelectionCriteria, rng: &mut impl Rng) -> Selection {
    let mut selection = Selection::default();

    let Some(choice) = CategoryChoice::parse(&criteria.category) else {
        selection
            .warnings
            .push(format!("unknown category \"{}\"", criteria.category));
        return selection;
    };
    let Some(difficulty) = Difficulty::parse(&criteria.difficulty) else {
        selection
            .warnings
            .push(format!("unknown difficulty \"{}\"", criteria.difficulty));
        return selection;
    };

    let mut matched: Vec<Question> = Vec::new();
    for industry in &criteria.industries {
        for category in choice.categories() {
            match bank.pool(industry, category, difficulty) {
                Some(pool) => matched.extend_from_slice(pool),
                None => selection.warnings.push(missing_cell(
                    industry,
                    category.key(),
                    difficulty.key(),
                )),
            }
        }
    }

    if let Some(ids) = &criteria.ids {
        // Retest mode: exact subset, no sampling. Keep pool order.
        matched.retain(|q| ids.contains(&q.id));
    } else if !criteria.take_all {
        matched.shuffle(rng);
        matched.truncate(SAMPLE_SIZE);
    }

    selection.questions = matched;
    selection
}

fn missing_cell(industry: &str, category: &str, difficulty: &str) -> String {
    format!("no questions for {industry}/{category}/{difficulty}")
}
