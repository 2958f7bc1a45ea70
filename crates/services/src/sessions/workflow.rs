use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use quiz_core::model::{HistoryRecord, SessionConfig};
use storage::repository::HistoryRepository;

use super::session::{OptionOrder, QuizAction, QuizPhase, QuizSession};
use super::view::{AnswerFeedback, QuestionView};
use crate::Clock;
use crate::error::SessionError;
use crate::question_bank::{self, QuestionBank};

/// Result of a `save` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new history row was written.
    Saved(HistoryRecord),
    /// The session had already been saved; nothing was written.
    AlreadySaved,
}

/// Orchestrates session start, answering and persisted saving.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    history: Arc<dyn HistoryRepository>,
    option_order: OptionOrder,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<QuestionBank>, history: Arc<dyn HistoryRepository>) -> Self {
        Self {
            clock,
            bank,
            history,
            option_order: OptionOrder::default(),
        }
    }

    #[must_use]
    pub fn with_option_order(mut self, option_order: OptionOrder) -> Self {
        self.option_order = option_order;
        self
    }

    #[must_use]
    pub fn option_order(&self) -> OptionOrder {
        self.option_order
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// A fresh session in the configuring phase.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(self.option_order)
    }

    /// Difficulty tags offered during configuration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the question bank cannot be loaded.
    pub async fn difficulties(&self) -> Result<Vec<String>, SessionError> {
        let questions = self.bank.load().await?;
        Ok(question_bank::distinct_difficulties(&questions))
    }

    /// Number of questions in the whole bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Bank` if the question bank cannot be loaded.
    pub async fn bank_size(&self) -> Result<usize, SessionError> {
        Ok(self.bank.load().await?.len())
    }

    /// Store the configuration and start the quiz in one step.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::configure`] and [`QuizLoopService::start`].
    pub async fn configure_and_start(
        &self,
        session: &mut QuizSession,
        config: SessionConfig,
    ) -> Result<(), SessionError> {
        session.configure(config)?;
        self.start(session).await
    }

    /// Sample questions for the configured filter and begin the quiz.
    ///
    /// Requesting more questions than the pool holds silently uses the pool size.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the configuring phase,
    /// `SessionError::NotConfigured` without a configuration and
    /// `SessionError::Bank` for load failures or an empty pool.
    pub async fn start(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        if session.phase() != QuizPhase::Configuring {
            return Err(SessionError::InvalidTransition {
                action: QuizAction::Start,
                phase: session.phase(),
            });
        }
        let config = session.config().cloned().ok_or(SessionError::NotConfigured)?;

        let questions = self.bank.load().await?;
        let picked = question_bank::sample(
            &questions,
            config.difficulty(),
            config.question_count(),
        )?;
        if picked.len() < config.question_count() {
            info!(
                requested = config.question_count(),
                available = picked.len(),
                "question count clamped to pool size"
            );
        }

        session.start(picked, self.clock.now())?;
        info!(
            username = config.username(),
            difficulty = %config.difficulty(),
            questions = session.total_questions(),
            "quiz started"
        );
        Ok(())
    }

    /// Snapshot of the current question with a freshly computed timer.
    #[must_use]
    pub fn current_view(&self, session: &QuizSession) -> Option<QuestionView> {
        session.question_view(self.clock.now())
    }

    /// Seconds on the current question so far, recomputed on every call.
    #[must_use]
    pub fn elapsed(&self, session: &QuizSession) -> Option<Duration> {
        session.elapsed(self.clock.now())
    }

    /// Answer the current question at the service clock's current time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the quiz is in progress.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        choice: &str,
    ) -> Result<AnswerFeedback, SessionError> {
        let feedback = session.answer(choice, self.clock.now())?;
        if feedback.finished {
            info!(
                score = session.score(),
                total = session.total_questions(),
                "quiz finished"
            );
        }
        Ok(feedback)
    }

    /// Append the finished session to the history store, at most once.
    ///
    /// A failed write leaves the session unsaved so the call can be retried.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the quiz is finished and
    /// `SessionError::Save` if the history store rejects the write.
    pub async fn save(&self, session: &mut QuizSession) -> Result<SaveOutcome, SessionError> {
        if session.phase() != QuizPhase::Finished {
            return Err(SessionError::InvalidTransition {
                action: QuizAction::Save,
                phase: session.phase(),
            });
        }
        if session.is_saved() {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let record = session.history_record()?;
        if let Err(err) = self.history.append_record(&record).await {
            warn!(error = %err, "saving quiz result failed");
            return Err(SessionError::Save(err));
        }
        session.mark_saved();
        info!(username = %record.username, score = record.score, "quiz result saved");
        Ok(SaveOutcome::Saved(record))
    }

    /// All saved results, or `None` if nothing has ever been saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if an existing store cannot be read.
    pub async fn history(&self) -> Result<Option<Vec<HistoryRecord>>, SessionError> {
        Ok(self.history.load_history().await?)
    }
}

impl std::fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("bank", &self.bank)
            .field("option_order", &self.option_order)
            .finish_non_exhaustive()
    }
}
