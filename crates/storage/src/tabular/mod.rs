//! CSV-backed question bank and history store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{HistoryRepository, QuestionSource, Storage, StorageError};

mod bank;
mod history;

pub use bank::{CsvQuestionSource, parse_questions};
pub use history::CsvHistoryStore;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Strip a UTF-8 byte order mark and surrounding whitespace from header cells.
fn clean_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim())
        .collect()
}

/// Returns the file length, or `None` if the file does not exist.
async fn existing_len(path: &Path) -> Result<Option<u64>, StorageError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta.len())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl Storage {
    /// Build a `Storage` reading the bank from `bank_path` and appending results to a CSV file.
    #[must_use]
    pub fn csv(bank_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        let questions: Arc<dyn QuestionSource> = Arc::new(CsvQuestionSource::new(bank_path));
        let history: Arc<dyn HistoryRepository> = Arc::new(CsvHistoryStore::new(history_path));
        Self { questions, history }
    }
}
