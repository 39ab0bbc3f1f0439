use std::collections::HashMap;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::question::{ALL_CATEGORIES, ALL_DIFFICULTIES, CategoryChoice, Difficulty, Question};
use crate::bank::repository::QuestionBank;
use crate::bank::selector::{self, SelectionCriteria};
use crate::config::Config;
use crate::session::quiz::{Advance, AnswerRecord, QuizState, SessionMode};
use crate::session::summary::{self, ResultSummary};
use crate::store::json_store::{JsonStore, ScoreGateway};
use crate::store::schema::{ProfileData, ScoreRecord};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Start,
    Quiz,
    Result,
    Review,
    History,
}

/// Start-screen picker state. `focus_row` indexes industry rows first, then
/// the category cycler, the difficulty cycler, and the start row.
pub struct StartSelection {
    pub industries: Vec<(String, bool)>,
    pub category: String,
    pub difficulty: String,
    pub focus_row: usize,
    pub notice: Option<String>,
}

impl StartSelection {
    pub fn row_count(&self) -> usize {
        self.industries.len() + 3
    }

    pub fn checked_industries(&self) -> Vec<String> {
        self.industries
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(industry, _)| industry.clone())
            .collect()
    }
}

/// Snapshot of a finished attempt. Result and review screens render from
/// this, so the live session can be reused for practice rounds while the
/// original outcome stays navigable.
#[derive(Clone)]
pub struct CompletedAttempt {
    pub questions: Vec<Question>,
    pub answers: HashMap<String, AnswerRecord>,
    pub summary: ResultSummary,
    pub mode: SessionMode,
}

impl CompletedAttempt {
    fn incorrect_ids(&self) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| self.answers.get(&q.id).is_none_or(|a| !a.correct))
            .map(|q| q.id.clone())
            .collect()
    }
}

pub struct App {
    pub screen: AppScreen,
    pub bank: QuestionBank,
    pub quiz: QuizState,
    pub attempt: Option<CompletedAttempt>,
    /// The fresh-test snapshot held while practice rounds are running.
    pub original: Option<CompletedAttempt>,
    pub start: StartSelection,
    pub theme: &'static Theme,
    pub config: Config,
    pub profile: ProfileData,
    pub store: Option<JsonStore>,
    pub guest: bool,
    pub should_quit: bool,
    pub save_note: String,
    pub review_scroll: usize,
    pub history: Vec<ScoreRecord>,
    last_criteria: Option<SelectionCriteria>,
    practice_round: u32,
    score_saved: bool,
    last_tick: Instant,
    rng: SmallRng,
}

impl App {
    pub fn new() -> Self {
        let mut config = Config::load().unwrap_or_default();
        config.normalize_filters();
        Self::with_parts(QuestionBank::load(), config, JsonStore::new().ok())
    }

    fn with_parts(bank: QuestionBank, config: Config, store: Option<JsonStore>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let profile = if let Some(ref s) = store {
            // load_profile returns None if file exists but can't parse (schema mismatch)
            match s.load_profile() {
                Some(pd) if !pd.needs_reset() => pd,
                _ => ProfileData::default(),
            }
        } else {
            ProfileData::default()
        };

        let mut industries: Vec<(String, bool)> = bank
            .industries()
            .into_iter()
            .map(|industry| {
                let checked = industry.eq_ignore_ascii_case(&config.default_industry);
                (industry, checked)
            })
            .collect();
        if !industries.iter().any(|(_, checked)| *checked) {
            if let Some(first) = industries.first_mut() {
                first.1 = true;
            }
        }

        let category = CategoryChoice::parse(&config.default_category)
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| "Mixed".to_string());
        let difficulty = Difficulty::parse(&config.default_difficulty)
            .map(|d| d.as_str().to_string())
            .unwrap_or_else(|| "Easy".to_string());

        let notice = match bank.load_warnings() {
            [] => None,
            [first, rest @ ..] if rest.is_empty() => Some(first.clone()),
            [first, rest @ ..] => Some(format!("{first} (+{} more)", rest.len())),
        };

        let start = StartSelection {
            focus_row: industries.len() + 2,
            industries,
            category,
            difficulty,
            notice,
        };

        let history = match (&store, config.history_limit) {
            (Some(s), limit) => s.recent_scores(limit),
            _ => Vec::new(),
        };

        Self {
            screen: AppScreen::Start,
            bank,
            quiz: QuizState::new(),
            attempt: None,
            original: None,
            start,
            theme,
            config,
            profile,
            store,
            guest: false,
            should_quit: false,
            save_note: String::new(),
            review_scroll: 0,
            history,
            last_criteria: None,
            practice_round: 0,
            score_saved: false,
            last_tick: Instant::now(),
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn set_theme(&mut self, name: &str) {
        if let Some(theme) = Theme::load(name) {
            self.theme = Box::leak(Box::new(theme));
            self.config.theme = name.to_string();
        }
    }

    pub fn toggle_focused_industry(&mut self) {
        let row = self.start.focus_row;
        if let Some((_, checked)) = self.start.industries.get_mut(row) {
            *checked = !*checked;
        }
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let choices: Vec<&str> = std::iter::once("Mixed")
            .chain(ALL_CATEGORIES.iter().map(|c| c.as_str()))
            .collect();
        self.start.category = cycled(&choices, &self.start.category, forward);
    }

    pub fn cycle_difficulty(&mut self, forward: bool) {
        let choices: Vec<&str> = ALL_DIFFICULTIES.iter().map(|d| d.as_str()).collect();
        self.start.difficulty = cycled(&choices, &self.start.difficulty, forward);
    }

    /// Launch a fresh test from the start-screen selection.
    pub fn start_test(&mut self) {
        let industries = self.start.checked_industries();
        if industries.is_empty() {
            self.start.notice = Some("select at least one industry".to_string());
            return;
        }

        let criteria =
            SelectionCriteria::new(industries, &self.start.category, &self.start.difficulty);
        self.launch(criteria, SessionMode::Fresh);
    }

    fn launch(&mut self, criteria: SelectionCriteria, mode: SessionMode) {
        let selection = selector::select(&self.bank, &criteria, &mut self.rng);
        if selection.is_empty() {
            self.start.notice = Some(match selection.warnings.first() {
                Some(warning) => warning.clone(),
                None => "no questions match the current filters".to_string(),
            });
            self.screen = AppScreen::Start;
            return;
        }

        let difficulty = Difficulty::parse(&criteria.difficulty);
        // abandoning any in-flight session; start() refuses mid-session restarts
        self.quiz = QuizState::new();
        self.quiz.start(selection.questions, difficulty, mode);

        if mode == SessionMode::Fresh {
            self.original = None;
            self.practice_round = 0;
            self.remember_defaults(&criteria);
        }
        self.last_criteria = Some(criteria);
        self.attempt = None;
        self.score_saved = false;
        self.save_note.clear();
        self.last_tick = Instant::now();
        self.screen = AppScreen::Quiz;
    }

    fn remember_defaults(&mut self, criteria: &SelectionCriteria) {
        if let Some(first) = criteria.industries.first() {
            self.config.default_industry = first.clone();
        }
        self.config.default_category = criteria.category.clone();
        self.config.default_difficulty = criteria.difficulty.clone();
    }

    /// Map a pressed character to an option key on the current question:
    /// letters match the key directly, digits pick the nth option.
    pub fn select_by_char(&mut self, ch: char) {
        let Some(question) = self.quiz.current_question() else {
            return;
        };
        let key = if let Some(digit) = ch.to_digit(10) {
            question
                .options
                .keys()
                .nth(digit.saturating_sub(1) as usize)
                .cloned()
        } else {
            Some(ch.to_ascii_uppercase().to_string())
        };
        if let Some(key) = key {
            self.quiz.select_option(&key);
        }
    }

    /// Manual advance; requires a selection for the displayed question.
    pub fn submit_current(&mut self) {
        if self.quiz.current_selection().is_none() {
            return;
        }
        if self.quiz.advance(None) == Advance::Completed {
            self.finish_session();
        }
    }

    /// Drive the countdown at one-second granularity off the event pump's
    /// faster ticks. Reacts to expiry by submitting the rest of the test.
    pub fn on_tick(&mut self) {
        if self.screen != AppScreen::Quiz || !self.quiz.is_in_progress() {
            return;
        }
        while self.last_tick.elapsed() >= Duration::from_secs(1) {
            self.last_tick += Duration::from_secs(1);
            if self.quiz.tick_second() {
                self.submit_remaining();
                return;
            }
        }
    }

    fn submit_remaining(&mut self) {
        while self.quiz.force_submit() == Advance::Moved {}
        self.finish_session();
    }

    fn finish_session(&mut self) {
        let summary = summary::summarize(
            &self.quiz.questions,
            &self.quiz.answers,
            self.quiz.elapsed_secs(),
        );
        let attempt = CompletedAttempt {
            questions: self.quiz.questions.clone(),
            answers: self.quiz.answers.clone(),
            summary,
            mode: self.quiz.mode,
        };

        self.save_note = if attempt.mode.is_practice() {
            "Practice rounds are not saved.".to_string()
        } else if self.guest {
            "Guest mode: result not saved.".to_string()
        } else {
            match self.save_score(&attempt) {
                Ok(()) => "Result saved.".to_string(),
                Err(err) => format!("Could not save result: {err}"),
            }
        };

        self.attempt = Some(attempt);
        self.screen = AppScreen::Result;
    }

    fn save_score(
        &mut self,
        attempt: &CompletedAttempt,
    ) -> Result<(), crate::store::json_store::StoreError> {
        // one record per finished test, no matter how often this runs
        if self.score_saved {
            return Ok(());
        }
        let Some(ref store) = self.store else {
            return Ok(());
        };
        let criteria = self.last_criteria.as_ref();

        let record = ScoreRecord {
            player: self.profile.display_name().to_string(),
            industry: criteria
                .map(|c| c.industries.join(", "))
                .unwrap_or_default(),
            category: criteria.map(|c| c.category.clone()).unwrap_or_default(),
            difficulty: criteria.map(|c| c.difficulty.clone()).unwrap_or_default(),
            score_percent: attempt.summary.percentage,
            correct_count: attempt.summary.correct_count as u32,
            total_questions: attempt.summary.total_questions as u32,
            time_taken_secs: attempt.summary.elapsed_secs,
            source: attempt.mode.source_tag().to_string(),
            recorded_at: chrono::Utc::now(),
        };
        store.append_score(record)?;
        self.score_saved = true;

        self.profile.total_tests += 1;
        self.profile.best_score = self.profile.best_score.max(attempt.summary.percentage);
        self.profile.last_test_date = Some(chrono::Utc::now().format("%Y-%m-%d").to_string());
        let _ = store.save_profile(&self.profile);

        self.history = store.recent_scores(self.config.history_limit);
        Ok(())
    }

    /// Practice round over the questions missed in the shown attempt.
    pub fn retest_incorrect(&mut self) {
        let Some(ref attempt) = self.attempt else {
            return;
        };
        let ids: HashSet<String> = attempt.incorrect_ids().into_iter().collect();
        if ids.is_empty() {
            self.save_note = "Nothing to retest: every question was answered correctly.".to_string();
            return;
        }
        let Some(criteria) = self.last_criteria.clone() else {
            return;
        };

        if !attempt.mode.is_practice() && self.original.is_none() {
            self.original = self.attempt.clone();
        }
        self.practice_round += 1;
        let round = self.practice_round;
        self.launch(criteria.with_ids(ids), SessionMode::Practice { round });
    }

    /// A new scored test narrowed to the weakest category of the shown
    /// attempt.
    pub fn retest_weakest(&mut self) {
        let Some(weakest) = self
            .attempt
            .as_ref()
            .and_then(|a| a.summary.weakest_category.clone())
        else {
            return;
        };
        let industries = match self.last_criteria.as_ref() {
            Some(criteria) => criteria.industries.clone(),
            None => self.start.checked_industries(),
        };
        let difficulty = self.start.difficulty.clone();
        self.launch(
            SelectionCriteria::new(industries, &weakest, &difficulty),
            SessionMode::Fresh,
        );
    }

    /// Leave practice navigation and show the original test outcome again.
    pub fn back_to_original(&mut self) {
        if let Some(original) = self.original.take() {
            self.attempt = Some(original);
            self.save_note = "Result saved.".to_string();
            self.screen = AppScreen::Result;
        }
    }

    pub fn open_review(&mut self) {
        if self.attempt.is_some() {
            self.review_scroll = 0;
            self.screen = AppScreen::Review;
        }
    }

    pub fn open_history(&mut self) {
        if let Some(ref store) = self.store {
            self.history = store.recent_scores(self.config.history_limit);
        }
        self.screen = AppScreen::History;
    }

    pub fn close_history(&mut self) {
        self.screen = if self.attempt.is_some() {
            AppScreen::Result
        } else {
            AppScreen::Start
        };
    }

    pub fn go_home(&mut self) {
        self.quiz = QuizState::new();
        self.attempt = None;
        self.original = None;
        self.start.notice = None;
        self.screen = AppScreen::Start;
    }
}

fn cycled(choices: &[&str], current: &str, forward: bool) -> String {
    let idx = choices.iter().position(|c| *c == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % choices.len()
    } else {
        (idx + choices.len() - 1) % choices.len()
    };
    choices[next].to_string()
}
