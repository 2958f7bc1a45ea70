use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use std::fmt;

use quiz_core::model::{HistoryRecord, Question, SessionConfig, TimingEntry};
use quiz_core::time::elapsed_between;

use super::progress::SessionProgress;
use super::view::{AnswerFeedback, QuestionView, QuizReport};
use crate::error::SessionError;

//
// ─── PHASES AND ACTIONS ────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz attempt. Moves strictly forward until `reset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    #[default]
    Configuring,
    InProgress,
    Finished,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizPhase::Configuring => "configuring",
            QuizPhase::InProgress => "in progress",
            QuizPhase::Finished => "finished",
        })
    }
}

/// User-facing actions, used to report rejected transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuizAction {
    Configure,
    Start,
    Answer,
    Save,
    Reset,
}

impl fmt::Display for QuizAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuizAction::Configure => "configure",
            QuizAction::Start => "start",
            QuizAction::Answer => "answer",
            QuizAction::Save => "save",
            QuizAction::Reset => "reset",
        })
    }
}

/// How answer choices are ordered while a question is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OptionOrder {
    /// Shuffle once when the question becomes current.
    #[default]
    Frozen,
    /// Shuffle again on every observation.
    PerRender,
}

fn shuffled_options(question: &Question) -> Vec<String> {
    let mut options: Vec<String> = question
        .options()
        .iter()
        .map(|option| (*option).to_string())
        .collect();
    options.shuffle(&mut rand::rng());
    options
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State that exists only between `start` and `reset`.
struct ActiveQuiz {
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    timing_log: Vec<TimingEntry>,
    question_started_at: DateTime<Utc>,
    choices: Vec<String>,
    result_saved: bool,
}

impl ActiveQuiz {
    fn current(&self) -> &Question {
        &self.questions[self.current_index]
    }
}

/// In-memory quiz attempt driven through configure → answer loop → finish.
///
/// Pure state machine: timestamps come from the caller so the services layer
/// clock stays the only time source.
pub struct QuizSession {
    option_order: OptionOrder,
    phase: QuizPhase,
    config: Option<SessionConfig>,
    active: Option<ActiveQuiz>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(OptionOrder::default())
    }
}

impl QuizSession {
    #[must_use]
    pub fn new(option_order: OptionOrder) -> Self {
        Self {
            option_order,
            phase: QuizPhase::Configuring,
            config: None,
            active: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn option_order(&self) -> OptionOrder {
        self.option_order
    }

    #[must_use]
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    fn ensure(&self, action: QuizAction, allowed: QuizPhase) -> Result<(), SessionError> {
        if self.phase == allowed {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    /// Store the settings for the next `start`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is configuring.
    pub fn configure(&mut self, config: SessionConfig) -> Result<(), SessionError> {
        self.ensure(QuizAction::Configure, QuizPhase::Configuring)?;
        self.config = Some(config);
        Ok(())
    }

    /// Begin the quiz with an already sampled question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is configuring,
    /// `SessionError::NotConfigured` if `configure` was never called, and
    /// `SessionError::Empty` if `questions` is empty.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure(QuizAction::Start, QuizPhase::Configuring)?;
        if self.config.is_none() {
            return Err(SessionError::NotConfigured);
        }
        let Some(first) = questions.first() else {
            return Err(SessionError::Empty);
        };

        let choices = shuffled_options(first);
        self.active = Some(ActiveQuiz {
            questions,
            current_index: 0,
            score: 0,
            timing_log: Vec::new(),
            question_started_at: started_at,
            choices,
            result_saved: false,
        });
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// The question awaiting an answer, if the quiz is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != QuizPhase::InProgress {
            return None;
        }
        self.active.as_ref().map(ActiveQuiz::current)
    }

    /// Answer choices for the current question in display order.
    #[must_use]
    pub fn choices(&self) -> Option<Vec<String>> {
        let question = self.current_question()?;
        match self.option_order {
            OptionOrder::Frozen => self.active.as_ref().map(|a| a.choices.clone()),
            OptionOrder::PerRender => Some(shuffled_options(question)),
        }
    }

    /// Time spent on the current question so far.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.phase != QuizPhase::InProgress {
            return None;
        }
        self.active
            .as_ref()
            .map(|a| elapsed_between(a.question_started_at, now))
    }

    #[must_use]
    pub fn question_view(&self, now: DateTime<Utc>) -> Option<QuestionView> {
        let question = self.current_question()?;
        let active = self.active.as_ref()?;
        Some(QuestionView {
            position: active.current_index + 1,
            total: active.questions.len(),
            text: question.text().to_string(),
            difficulty: question.difficulty().to_string(),
            choices: self.choices()?,
            elapsed: self.elapsed(now)?,
        })
    }

    /// Record an answer for the current question and advance.
    ///
    /// `answered_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the quiz is in progress.
    pub fn answer(
        &mut self,
        choice: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerFeedback, SessionError> {
        self.ensure(QuizAction::Answer, QuizPhase::InProgress)?;
        let Some(active) = self.active.as_mut() else {
            return Err(SessionError::InvalidTransition {
                action: QuizAction::Answer,
                phase: self.phase,
            });
        };

        let question = active.current();
        let timing = TimingEntry::from_elapsed(
            question.text(),
            elapsed_between(active.question_started_at, answered_at),
        );
        let correct = question.is_correct(choice);
        let correct_answer = question.answer().to_string();
        let explanation = question.explanation().to_string();

        active.timing_log.push(timing.clone());
        if correct {
            active.score += 1;
        }

        let finished = active.current_index + 1 >= active.questions.len();
        if finished {
            self.phase = QuizPhase::Finished;
        } else {
            active.current_index += 1;
            active.question_started_at = answered_at;
            active.choices = shuffled_options(active.current());
        }

        Ok(AnswerFeedback {
            correct,
            correct_answer,
            explanation,
            timing,
            finished,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.score)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.questions.len())
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.current_index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.active
            .as_ref()
            .map(|a| a.questions.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn timing_log(&self) -> &[TimingEntry] {
        self.active
            .as_ref()
            .map(|a| a.timing_log.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.result_saved)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        let answered = self.timing_log().len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            score: self.score(),
            is_complete: self.phase == QuizPhase::Finished,
        }
    }

    /// Final numbers, available once the quiz is finished.
    #[must_use]
    pub fn report(&self) -> Option<QuizReport> {
        if self.phase != QuizPhase::Finished {
            return None;
        }
        let active = self.active.as_ref()?;
        Some(QuizReport {
            username: self
                .config
                .as_ref()
                .map(|c| c.username().to_string())
                .unwrap_or_default(),
            score: active.score,
            total: active.questions.len(),
            timing_log: active.timing_log.clone(),
            saved: active.result_saved,
        })
    }

    pub(crate) fn history_record(&self) -> Result<HistoryRecord, SessionError> {
        self.ensure(QuizAction::Save, QuizPhase::Finished)?;
        let report = self.report().ok_or(SessionError::InvalidTransition {
            action: QuizAction::Save,
            phase: self.phase,
        })?;
        Ok(HistoryRecord::new(
            report.username,
            report.score,
            &report.timing_log,
        ))
    }

    pub(crate) fn mark_saved(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.result_saved = true;
        }
    }

    /// Discard all state and return to configuring with no settings kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` while a quiz is in progress.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.phase == QuizPhase::InProgress {
            return Err(SessionError::InvalidTransition {
                action: QuizAction::Reset,
                phase: self.phase,
            });
        }
        self.phase = QuizPhase::Configuring;
        self.config = None;
        self.active = None;
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("option_order", &self.option_order)
            .field("questions_len", &self.total_questions())
            .field("current_index", &self.current_index())
            .field("score", &self.score())
            .field("answered", &self.timing_log().len())
            .field("saved", &self.is_saved())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
