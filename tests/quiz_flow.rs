use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use quizdr::bank::question::Difficulty;
use quizdr::bank::repository::QuestionBank;
use quizdr::bank::selector::{self, SAMPLE_SIZE, SelectionCriteria};
use quizdr::session::quiz::{Advance, QuizState, SessionMode};
use quizdr::session::summary::summarize;
use quizdr::store::json_store::{JsonStore, ScoreGateway};
use quizdr::store::schema::ScoreRecord;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(99)
}

fn mixed_easy_selection(bank: &QuestionBank) -> Vec<quizdr::bank::question::Question> {
    let criteria = SelectionCriteria::new(vec!["Education".to_string()], "Mixed", "Easy");
    let selection = selector::select(bank, &criteria, &mut rng());
    assert!(selection.warnings.is_empty());
    selection.questions
}

fn wrong_key(question: &quizdr::bank::question::Question) -> String {
    question
        .options
        .keys()
        .find(|key| **key != question.answer)
        .cloned()
        .unwrap()
}

#[test]
fn test_full_flow_perfect_score() {
    let bank = QuestionBank::load();
    let questions = mixed_easy_selection(&bank);
    assert_eq!(questions.len(), SAMPLE_SIZE);

    let mut quiz = QuizState::new();
    assert!(quiz.start(questions, Some(Difficulty::Easy), SessionMode::Fresh));
    assert_eq!(quiz.time_limit, 300);

    while let Some(question) = quiz.current_question() {
        let answer = question.answer.clone();
        assert!(quiz.select_option(&answer));
        if quiz.advance(None) == Advance::Completed {
            break;
        }
    }
    assert!(quiz.is_completed());

    let summary = summarize(&quiz.questions, &quiz.answers, quiz.elapsed_secs());
    assert_eq!(summary.total_questions, SAMPLE_SIZE);
    assert_eq!(summary.correct_count, SAMPLE_SIZE);
    assert_eq!(summary.percentage, 100);
    assert!(summary.weakest_category.is_some());
    assert!(summary.incorrect_questions.is_empty());
}

#[test]
fn test_retest_flow_narrows_to_missed_questions() {
    let bank = QuestionBank::load();
    let questions = mixed_easy_selection(&bank);

    let mut quiz = QuizState::new();
    quiz.start(questions, Some(Difficulty::Easy), SessionMode::Fresh);

    // miss every third question
    let mut position = 0;
    while let Some(question) = quiz.current_question() {
        let key = if position % 3 == 0 {
            wrong_key(question)
        } else {
            question.answer.clone()
        };
        quiz.select_option(&key);
        position += 1;
        if quiz.advance(None) == Advance::Completed {
            break;
        }
    }

    let missed = quiz.incorrect_ids();
    assert_eq!(missed.len(), 4);

    let ids: HashSet<String> = missed.iter().cloned().collect();
    let criteria = SelectionCriteria::new(vec!["Education".to_string()], "Mixed", "Easy")
        .with_ids(ids.clone());
    let retest = selector::select(&bank, &criteria, &mut rng());

    assert_eq!(retest.questions.len(), missed.len());
    assert!(retest.questions.iter().all(|q| ids.contains(&q.id)));

    // the retest runs as an unscored practice round
    let mut practice = QuizState::new();
    assert!(practice.start(
        retest.questions,
        Some(Difficulty::Easy),
        SessionMode::Practice { round: 1 },
    ));
    assert!(practice.mode.is_practice());
    assert_eq!(practice.time_limit, 30 * missed.len() as u32);
}

#[test]
fn test_retest_with_stale_id_shrinks_silently() {
    let bank = QuestionBank::load();
    let ids = HashSet::from(["edu-gen-e1".to_string(), "removed-question".to_string()]);
    let criteria =
        SelectionCriteria::new(vec!["Education".to_string()], "Mixed", "Easy").with_ids(ids);
    let selection = selector::select(&bank, &criteria, &mut rng());

    assert_eq!(selection.questions.len(), 1);
    assert_eq!(selection.questions[0].id, "edu-gen-e1");
}

#[test]
fn test_timeout_submits_remaining_questions() {
    let bank = QuestionBank::load();
    let questions = mixed_easy_selection(&bank);
    let total = questions.len();

    let mut quiz = QuizState::new();
    quiz.start(questions, Some(Difficulty::Easy), SessionMode::Fresh);

    // answer the first two, then let the clock run out
    for _ in 0..2 {
        let answer = quiz.current_question().unwrap().answer.clone();
        quiz.select_option(&answer);
        quiz.advance(None);
    }

    quiz.time_left = 1;
    assert!(quiz.tick_second());
    while quiz.force_submit() == Advance::Moved {}
    assert!(quiz.is_completed());

    let summary = summarize(&quiz.questions, &quiz.answers, quiz.elapsed_secs());
    assert_eq!(summary.total_questions, total);
    assert_eq!(summary.correct_count, 2);
    // force-submitted questions are logged with no selection and count as incorrect
    assert_eq!(summary.incorrect_questions.len(), total - 2);
    assert_eq!(summary.percentage, 20);
}

#[test]
fn test_score_history_keeps_newest_first_with_limit() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();

    for (i, score) in [40u32, 55, 70, 85, 90, 65].iter().enumerate() {
        store
            .append_score(ScoreRecord {
                player: "Ada".to_string(),
                industry: "Education".to_string(),
                category: "Mixed".to_string(),
                difficulty: "Easy".to_string(),
                score_percent: *score,
                correct_count: score / 10,
                total_questions: 10,
                time_taken_secs: 100 + i as u64,
                source: "test".to_string(),
                recorded_at: Utc.with_ymd_and_hms(2026, 3, 1, i as u32, 0, 0).unwrap(),
            })
            .unwrap();
    }

    let recent = store.recent_scores(5);
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].score_percent, 65);
    assert_eq!(recent[4].score_percent, 55);
    // the oldest record falls off the shown window but stays on disk
    assert_eq!(store.recent_scores(10).len(), 6);
}

#[test]
fn test_practice_mode_survives_the_whole_session() {
    let bank = QuestionBank::load();
    let questions = mixed_easy_selection(&bank);
    let mut quiz = QuizState::new();
    quiz.start(questions, Some(Difficulty::Easy), SessionMode::Practice { round: 2 });
    while quiz.force_submit() == Advance::Moved {}
    assert!(quiz.is_completed());

    // the persistence gate keys off these after completion
    assert!(quiz.mode.is_practice());
    assert_eq!(quiz.mode.source_tag(), "practice");
    assert_eq!(quiz.mode, SessionMode::Practice { round: 2 });
}

#[test]
fn test_weakest_category_drives_followup_selection() {
    let bank = QuestionBank::load();
    let questions = mixed_easy_selection(&bank);

    let mut quiz = QuizState::new();
    quiz.start(questions, Some(Difficulty::Easy), SessionMode::Fresh);

    // miss exactly the Verbal questions
    while let Some(question) = quiz.current_question() {
        let key = if question.category == "Verbal" {
            wrong_key(question)
        } else {
            question.answer.clone()
        };
        quiz.select_option(&key);
        if quiz.advance(None) == Advance::Completed {
            break;
        }
    }

    let summary = summarize(&quiz.questions, &quiz.answers, quiz.elapsed_secs());
    if summary
        .category_stats
        .iter()
        .any(|(name, _)| name == "Verbal")
    {
        assert_eq!(summary.weakest_category.as_deref(), Some("Verbal"));

        let criteria = SelectionCriteria::new(
            vec!["Education".to_string()],
            summary.weakest_category.as_deref().unwrap(),
            "Easy",
        );
        let followup = selector::select(&bank, &criteria, &mut rng());
        assert!(!followup.is_empty());
        assert!(followup.questions.iter().all(|q| q.category == "Verbal"));
    }
}
