use async_trait::async_trait;
use quiz_core::model::{HistoryRecord, Question, QuestionError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("question bank is empty")]
    Empty,

    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Persisted shape for a question bank row.
///
/// Mirrors the tabular source so adapters can deserialize rows without
/// leaking storage concerns into the domain `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub answer: String,
    pub difficulty: String,
    pub explanation: String,
}

impl QuestionRecord {
    /// Column headers every question source must provide.
    pub const REQUIRED_COLUMNS: [&'static str; 8] = [
        "question",
        "option1",
        "option2",
        "option3",
        "option4",
        "answer",
        "difficulty",
        "explanation",
    ];

    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let [o1, o2, o3, o4] = question.options();
        Self {
            question: question.text().to_owned(),
            option1: o1.to_owned(),
            option2: o2.to_owned(),
            option3: o3.to_owned(),
            option4: o4.to_owned(),
            answer: question.answer().to_owned(),
            difficulty: question.difficulty().to_owned(),
            explanation: question.explanation().to_owned(),
        }
    }

    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the row fails domain validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            self.question,
            [self.option1, self.option2, self.option3, self.option4],
            self.answer,
            self.difficulty,
            self.explanation,
        )
    }
}

/// Read-only source of the full question bank.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Read every question from the backing source.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is missing, malformed or empty.
    async fn fetch_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Append-only store of finished quiz results.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one record, creating the store if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn append_record(&self, record: &HistoryRecord) -> Result<(), StorageError>;

    /// Load all records in insertion order.
    ///
    /// Returns `Ok(None)` when nothing has ever been stored: the backing file
    /// does not exist, or the backing table holds no rows. An existing but
    /// empty file yields `Ok(Some(vec![]))`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing store cannot be read.
    async fn load_history(&self) -> Result<Option<Vec<HistoryRecord>>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    history: Arc<Mutex<Option<Vec<HistoryRecord>>>>,
    fetches: Arc<Mutex<usize>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        let repo = Self::new();
        if let Ok(mut guard) = repo.questions.lock() {
            *guard = questions;
        }
        repo
    }

    /// Number of times `fetch_questions` has been called.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().map(|guard| *guard).unwrap_or(0)
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn fetch_questions(&self) -> Result<Vec<Question>, StorageError> {
        {
            let mut count = self
                .fetches
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            *count += 1;
        }
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.is_empty() {
            return Err(StorageError::Empty);
        }
        Ok(guard.clone())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn append_record(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get_or_insert_with(Vec::new).push(record.clone());
        Ok(())
    }

    async fn load_history(&self) -> Result<Option<Vec<HistoryRecord>>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

/// Aggregates the question source and history store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        let repo = InMemoryRepository::with_questions(questions);
        let questions: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let history: Arc<dyn HistoryRepository> = Arc::new(repo);
        Self { questions, history }
    }
}
