//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ConfigError, DifficultyFilter};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::{QuizAction, QuizPhase};

/// Errors emitted by `QuestionBank`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank unavailable: {0}")]
    DataSource(#[from] StorageError),
    #[error("no questions match difficulty {filter}")]
    EmptyPool { filter: DifficultyFilter },
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session has not been configured")]
    NotConfigured,
    #[error("cannot {action} while the session is {phase}")]
    InvalidTransition { action: QuizAction, phase: QuizPhase },
    #[error("failed to save result: {0}")]
    Save(#[source] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bank(#[from] QuestionBankError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Bank(#[from] QuestionBankError),
}
