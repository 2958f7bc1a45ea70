use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::Question;
use tracing::debug;

use super::{clean_headers, ser};
use crate::repository::{QuestionRecord, QuestionSource, StorageError};

/// Question bank stored as a CSV file with one question per row.
#[derive(Debug, Clone)]
pub struct CsvQuestionSource {
    path: PathBuf,
}

impl CsvQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parse a question bank from raw CSV bytes.
///
/// # Errors
///
/// Returns `StorageError::MissingColumns` if a required header is absent,
/// `StorageError::Serialization` for unreadable or invalid rows, and
/// `StorageError::Empty` if no rows remain.
pub fn parse_questions(bytes: &[u8]) -> Result<Vec<Question>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = clean_headers(reader.headers().map_err(ser)?);
    let missing: Vec<String> = QuestionRecord::REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(StorageError::MissingColumns { columns: missing });
    }
    reader.set_headers(headers);

    let mut questions = Vec::new();
    for (i, row) in reader.deserialize::<QuestionRecord>().enumerate() {
        // Row numbers are 1-based and count the header line.
        let line = i + 2;
        let record = row.map_err(|e| StorageError::Serialization(format!("row {line}: {e}")))?;
        let question = record
            .into_question()
            .map_err(|e| StorageError::Serialization(format!("row {line}: {e}")))?;
        questions.push(question);
    }

    if questions.is_empty() {
        return Err(StorageError::Empty);
    }
    Ok(questions)
}

#[async_trait]
impl QuestionSource for CsvQuestionSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let questions = parse_questions(&bytes)?;
        debug!(path = %self.path.display(), count = questions.len(), "question bank read");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "question,option1,option2,option3,option4,answer,difficulty,explanation\n";

    #[test]
    fn parses_rows_in_file_order() {
        let data = format!(
            "{HEADER}What is H2O?,Water,Salt,Air,Fire,Water,easy,Two hydrogens\n\
             Speed of light?,1,2,3,\"299,792 km/s\",\"299,792 km/s\",hard,Physics\n"
        );
        let questions = parse_questions(data.as_bytes()).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text(), "What is H2O?");
        assert_eq!(questions[1].answer(), "299,792 km/s");
        assert_eq!(questions[1].difficulty(), "hard");
    }

    #[test]
    fn tolerates_bom_and_extra_columns() {
        let data = "\u{feff}question,option1,option2,option3,option4,answer,difficulty,explanation,source\n\
                    Q,a,b,c,d,b,easy,why,book\n";
        let questions = parse_questions(data.as_bytes()).unwrap();
        assert_eq!(questions[0].answer(), "b");
    }

    #[test]
    fn reports_missing_columns() {
        let data = "question,option1,option2,option3,option4,answer\nQ,a,b,c,d,a\n";
        let err = parse_questions(data.as_bytes()).unwrap_err();
        match err {
            StorageError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["difficulty".to_string(), "explanation".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let err = parse_questions(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::Empty));
    }

    #[test]
    fn answer_must_be_an_option() {
        let data = format!("{HEADER}Q,a,b,c,d,z,easy,why\n");
        let err = parse_questions(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg.starts_with("row 2")));
    }
}
