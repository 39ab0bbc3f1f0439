use std::collections::HashMap;

use crate::bank::question::Question;
use crate::session::quiz::AnswerRecord;

/// Correct/total tally for one category group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTally {
    pub correct: usize,
    pub total: usize,
}

impl CategoryTally {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Everything derived from a finished answer log. Pure data; computing it
/// twice from the same inputs yields the same summary.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSummary {
    pub total_questions: usize,
    pub correct_count: usize,
    /// Rounded percentage, 0 for an empty session.
    pub percentage: u32,
    pub elapsed_secs: u64,
    /// Per-category tallies in first-encountered (session) order.
    pub category_stats: Vec<(String, CategoryTally)>,
    /// Category with the lowest accuracy; ties keep the first encountered.
    /// `None` when nothing was answered.
    pub weakest_category: Option<String>,
    pub incorrect_questions: Vec<Question>,
}

impl ResultSummary {
    pub fn avg_secs_per_question(&self) -> u64 {
        if self.total_questions == 0 {
            return 0;
        }
        self.elapsed_secs / self.total_questions as u64
    }
}

/// Derive the result summary for one attempt. The answer map is already
/// deduplicated by question id (last write wins), so each question counts at
/// most once. Questions without a logged answer count toward the total only.
pub fn summarize(
    questions: &[Question],
    answers: &HashMap<String, AnswerRecord>,
    elapsed_secs: u64,
) -> ResultSummary {
    let total_questions = questions.len();
    let mut correct_count = 0;
    let mut category_stats: Vec<(String, CategoryTally)> = Vec::new();
    let mut incorrect_questions = Vec::new();

    for question in questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        let slot = match category_stats.iter().position(|(c, _)| *c == answer.category) {
            Some(i) => i,
            None => {
                category_stats.push((answer.category.clone(), CategoryTally::default()));
                category_stats.len() - 1
            }
        };
        let tally = &mut category_stats[slot].1;
        tally.total += 1;
        if answer.correct {
            tally.correct += 1;
            correct_count += 1;
        } else {
            incorrect_questions.push(question.clone());
        }
    }

    let percentage = if total_questions == 0 {
        0
    } else {
        let pct = (correct_count as f64 / total_questions as f64 * 100.0).round() as u32;
        pct.min(100)
    };

    let mut weakest_category = None;
    let mut lowest_accuracy = f64::INFINITY;
    for (category, tally) in &category_stats {
        if tally.accuracy() < lowest_accuracy {
            lowest_accuracy = tally.accuracy();
            weakest_category = Some(category.clone());
        }
    }

    ResultSummary {
        total_questions,
        correct_count,
        percentage,
        elapsed_secs,
        category_stats,
        weakest_category,
        incorrect_questions,
    }
}

/// One tip line per category, bucketed by accuracy.
pub fn improvement_tips(category_stats: &[(String, CategoryTally)]) -> Vec<String> {
    category_stats
        .iter()
        .map(|(category, tally)| {
            let accuracy = tally.accuracy() * 100.0;
            if accuracy >= 90.0 {
                format!("{category}: Excellent work!")
            } else if accuracy >= 60.0 {
                format!("{category}: Good, but review core concepts to strengthen.")
            } else {
                format!("{category}: Needs improvement. Focus on practice and understanding key ideas.")
            }
        })
        .collect()
}

/// Headline for the result screen.
pub fn score_message(percentage: u32) -> &'static str {
    if percentage >= 90 {
        "Congratulations!"
    } else if percentage >= 70 {
        "Well done!"
    } else if percentage >= 30 {
        "Keep practising!"
    } else {
        "Don't give up!"
    }
}

/// Headline plus encouragement line for a practice round.
pub fn practice_message(percentage: u32) -> (&'static str, &'static str) {
    if percentage == 100 {
        (
            "Perfect practice!",
            "Outstanding! You've mastered these questions.",
        )
    } else if percentage >= 80 {
        (
            "Excellent progress!",
            "Great improvement! Keep practicing the remaining questions.",
        )
    } else if percentage >= 60 {
        (
            "Good improvement!",
            "You're getting better. Practice makes perfect.",
        )
    } else if percentage >= 40 {
        (
            "Keep practicing!",
            "Don't give up. Each practice session helps you improve.",
        )
    } else {
        (
            "Practice more!",
            "Focus on understanding each question. You'll get there.",
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn question(id: &str, category: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("prompt {id}"),
            options: BTreeMap::from([
                ("A".to_string(), "right".to_string()),
                ("B".to_string(), "wrong".to_string()),
            ]),
            answer: "A".to_string(),
            category: category.to_string(),
            explanation: None,
        }
    }

    fn answer(id: &str, category: &str, correct: bool) -> (String, AnswerRecord) {
        (
            id.to_string(),
            AnswerRecord {
                question_id: id.to_string(),
                category: category.to_string(),
                selected: Some(if correct { "A" } else { "B" }.to_string()),
                correct,
            },
        )
    }

    #[test]
    fn test_empty_session_is_zero_percent_without_weakest() {
        let summary = summarize(&[], &HashMap::new(), 0);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.total_questions, 0);
        assert!(summary.weakest_category.is_none());
        assert!(summary.category_stats.is_empty());
    }

    #[test]
    fn test_percentage_rounds() {
        let questions = vec![
            question("a", "General"),
            question("b", "General"),
            question("c", "General"),
        ];
        let answers = HashMap::from([
            answer("a", "General", true),
            answer("b", "General", false),
            answer("c", "General", false),
        ]);
        let summary = summarize(&questions, &answers, 30);
        // 1/3 rounds to 33
        assert_eq!(summary.percentage, 33);
        assert_eq!(summary.correct_count, 1);
    }

    #[test]
    fn test_category_tallies_and_weakest() {
        let questions = vec![
            question("g1", "General"),
            question("g2", "General"),
            question("v1", "Verbal"),
            question("v2", "Verbal"),
        ];
        let answers = HashMap::from([
            answer("g1", "General", true),
            answer("g2", "General", true),
            answer("v1", "Verbal", true),
            answer("v2", "Verbal", false),
        ]);
        let summary = summarize(&questions, &answers, 120);

        assert_eq!(summary.category_stats.len(), 2);
        assert_eq!(summary.category_stats[0].0, "General");
        assert_eq!(summary.weakest_category.as_deref(), Some("Verbal"));
        assert_eq!(summary.incorrect_questions.len(), 1);
        assert_eq!(summary.incorrect_questions[0].id, "v2");
    }

    #[test]
    fn test_weakest_tie_keeps_first_encountered() {
        let questions = vec![question("g1", "General"), question("v1", "Verbal")];
        let answers = HashMap::from([
            answer("g1", "General", true),
            answer("v1", "Verbal", true),
        ]);
        let summary = summarize(&questions, &answers, 10);
        assert_eq!(summary.weakest_category.as_deref(), Some("General"));
    }

    #[test]
    fn test_unanswered_questions_count_toward_total_only() {
        let questions = vec![question("a", "General"), question("b", "General")];
        let answers = HashMap::from([answer("a", "General", true)]);
        let summary = summarize(&questions, &answers, 60);
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.percentage, 50);
        assert_eq!(summary.category_stats[0].1.total, 1);
        assert!(summary.incorrect_questions.is_empty());
    }

    #[test]
    fn test_summarize_is_pure() {
        let questions = vec![question("a", "General")];
        let answers = HashMap::from([answer("a", "General", false)]);
        let first = summarize(&questions, &answers, 42);
        let second = summarize(&questions, &answers, 42);
        assert_eq!(first, second);
    }

    #[test]
    fn test_tip_buckets() {
        let stats = vec![
            ("Verbal".to_string(), CategoryTally { correct: 9, total: 10 }),
            ("Logical".to_string(), CategoryTally { correct: 6, total: 10 }),
            ("Numerical".to_string(), CategoryTally { correct: 2, total: 10 }),
        ];
        let tips = improvement_tips(&stats);
        assert!(tips[0].contains("Excellent"));
        assert!(tips[1].contains("review core concepts"));
        assert!(tips[2].contains("Needs improvement"));
    }

    #[test]
    fn test_score_message_bands() {
        assert_eq!(score_message(95), "Congratulations!");
        assert_eq!(score_message(70), "Well done!");
        assert_eq!(score_message(30), "Keep practising!");
        assert_eq!(score_message(10), "Don't give up!");
    }

    #[test]
    fn test_avg_secs_per_question_guards_zero() {
        let summary = summarize(&[], &HashMap::new(), 300);
        assert_eq!(summary.avg_secs_per_question(), 0);
    }
}
