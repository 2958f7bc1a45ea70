use std::path::PathBuf;
use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::question_bank::QuestionBank;
use crate::sessions::{OptionOrder, QuizLoopService, SessionRegistry};

/// Assembles app-facing services and loads the question bank up front.
#[derive(Clone)]
pub struct AppServices {
    bank: Arc<QuestionBank>,
    quiz_loop: Arc<QuizLoopService>,
    sessions: SessionRegistry,
}

impl AppServices {
    /// Build services over an already assembled `Storage`.
    ///
    /// The bank is read here so a missing or malformed source fails startup
    /// before any session exists.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Bank` if the question bank cannot be loaded.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        option_order: OptionOrder,
    ) -> Result<Self, AppServicesError> {
        let bank = Arc::new(QuestionBank::new(Arc::clone(&storage.questions)));
        bank.load().await?;

        let quiz_loop = Arc::new(
            QuizLoopService::new(clock, Arc::clone(&bank), Arc::clone(&storage.history))
                .with_option_order(option_order),
        );

        Ok(Self {
            bank,
            quiz_loop,
            sessions: SessionRegistry::new(),
        })
    }

    /// Build services reading the bank and writing history as CSV files.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Bank` if the question bank cannot be loaded.
    pub async fn new_csv(
        bank_path: impl Into<PathBuf>,
        history_path: impl Into<PathBuf>,
        clock: Clock,
        option_order: OptionOrder,
    ) -> Result<Self, AppServicesError> {
        Self::from_storage(Storage::csv(bank_path, history_path), clock, option_order).await
    }

    /// Build services reading the bank from CSV and keeping history in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if `SQLite` setup or the bank load fails.
    pub async fn new_sqlite_history(
        bank_path: impl Into<PathBuf>,
        database_url: &str,
        clock: Clock,
        option_order: OptionOrder,
    ) -> Result<Self, AppServicesError> {
        let storage =
            Storage::csv_with_sqlite_history(bank_path, database_url, clock.clone()).await?;
        Self::from_storage(storage, clock, option_order).await
    }

    #[must_use]
    pub fn question_bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn sessions(&self) -> SessionRegistry {
        self.sessions.clone()
    }
}
