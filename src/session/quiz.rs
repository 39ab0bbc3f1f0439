use std::collections::HashMap;
use std::time::Instant;

use crate::bank::question::{Difficulty, Question};

/// One logged answer. Keyed by question id in the session's answer map, so a
/// later answer for the same question replaces the earlier one.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerRecord {
    pub question_id: String,
    /// Category copied from the question at answer time.
    pub category: String,
    /// `None` when the question was force-submitted with nothing selected.
    pub selected: Option<String>,
    pub correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMode {
    /// A normal test; its result is eligible for the score history.
    Fresh,
    /// A retest of previously-incorrect questions. Never persisted.
    Practice { round: u32 },
}

impl SessionMode {
    pub fn is_practice(self) -> bool {
        matches!(self, SessionMode::Practice { .. })
    }

    pub fn source_tag(self) -> &'static str {
        match self {
            SessionMode::Fresh => "test",
            SessionMode::Practice { .. } => "practice",
        }
    }
}

/// What an `advance` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    Moved,
    /// The session just completed (last question submitted, or forced).
    Completed,
    /// Nothing happened (not in progress).
    Ignored,
}

/// The test-session state machine. One instance per attempt; every mutation
/// goes through a named transition, and out-of-state calls are no-ops.
///
/// Invariant: `0 <= index <= questions.len()`, with `index == questions.len()`
/// only in the `Completed` phase.
pub struct QuizState {
    pub questions: Vec<Question>,
    pub index: usize,
    pub answers: HashMap<String, AnswerRecord>,
    pub phase: Phase,
    pub mode: SessionMode,
    pub time_limit: u32,
    pub time_left: u32,
    timer_expired: bool,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
}

impl QuizState {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            index: 0,
            answers: HashMap::new(),
            phase: Phase::NotStarted,
            mode: SessionMode::Fresh,
            time_limit: 0,
            time_left: 0,
            timer_expired: false,
            started_at: None,
            finished_at: None,
        }
    }

    /// Total countdown for a test: per-question allowance times question
    /// count. An unparseable difficulty falls back to the Easy allowance.
    pub fn time_limit_for(difficulty: Option<Difficulty>, question_count: usize) -> u32 {
        let per_question = difficulty.map_or(30, Difficulty::seconds_per_question);
        per_question * question_count as u32
    }

    /// Begin a new attempt. Valid from `NotStarted` or `Completed`; starting
    /// over an in-progress session is a no-op and returns false.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        difficulty: Option<Difficulty>,
        mode: SessionMode,
    ) -> bool {
        if self.phase == Phase::InProgress {
            return false;
        }
        let time_limit = Self::time_limit_for(difficulty, questions.len());
        self.questions = questions;
        self.index = 0;
        self.answers.clear();
        self.phase = Phase::InProgress;
        self.mode = mode;
        self.time_limit = time_limit;
        self.time_left = time_limit;
        self.timer_expired = false;
        self.started_at = Some(Instant::now());
        self.finished_at = None;
        true
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// The active selection for the displayed question, i.e. the latest
    /// logged answer for it. Moving between questions restores this
    /// automatically because it is a lookup, not separate state.
    pub fn current_selection(&self) -> Option<&str> {
        let question = self.current_question()?;
        self.answers.get(&question.id)?.selected.as_deref()
    }

    /// Upsert the answer for the displayed question without advancing.
    /// Selection and advancing are decoupled transitions.
    pub fn select_option(&mut self, option_key: &str) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.options.contains_key(option_key) {
            return false;
        }
        let record = AnswerRecord {
            question_id: question.id.clone(),
            category: question.category.clone(),
            selected: Some(option_key.to_string()),
            correct: question.is_correct(option_key),
        };
        self.answers.insert(record.question_id.clone(), record);
        true
    }

    /// Record the answer for the current question (explicit option if given,
    /// else whatever is selected) and move forward; submitting the last
    /// question completes the session. A call with no current question forces
    /// completion.
    pub fn advance(&mut self, selected: Option<String>) -> Advance {
        if self.phase != Phase::InProgress {
            return Advance::Ignored;
        }
        let Some(question) = self.current_question().cloned() else {
            self.complete();
            return Advance::Completed;
        };

        let choice = selected.or_else(|| {
            self.answers
                .get(&question.id)
                .and_then(|a| a.selected.clone())
        });
        let correct = choice.as_deref().is_some_and(|key| question.is_correct(key));
        self.answers.insert(
            question.id.clone(),
            AnswerRecord {
                question_id: question.id.clone(),
                category: question.category.clone(),
                selected: choice,
                correct,
            },
        );

        if self.index + 1 >= self.questions.len() {
            self.complete();
            Advance::Completed
        } else {
            self.index += 1;
            Advance::Moved
        }
    }

    /// Step back one question. Valid only when not at the first question.
    pub fn go_back(&mut self) -> bool {
        if self.phase != Phase::InProgress || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Advance the countdown by one second. Returns true exactly once, when
    /// the countdown reaches zero; after that the timer stays disabled until
    /// the next `start`. The caller reacts with one `force_submit`.
    pub fn tick_second(&mut self) -> bool {
        if self.phase != Phase::InProgress || self.timer_expired || self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.timer_expired = true;
            return true;
        }
        false
    }

    /// Timeout path: submit the displayed question with whatever is selected
    /// (possibly nothing), or force completion when no question is displayed.
    pub fn force_submit(&mut self) -> Advance {
        if self.phase != Phase::InProgress {
            return Advance::Ignored;
        }
        if self.current_question().is_none() {
            self.complete();
            return Advance::Completed;
        }
        self.advance(None)
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        self.index = self.questions.len();
        self.finished_at = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> u64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs(),
            (Some(start), None) => start.elapsed().as_secs(),
            _ => 0,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Ids of questions answered incorrectly, in session order.
    pub fn incorrect_ids(&self) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| self.answers.get(&q.id).is_some_and(|a| !a.correct))
            .map(|q| q.id.clone())
            .collect()
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new()
    }
}
