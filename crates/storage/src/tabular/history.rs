use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::HistoryRecord;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

use super::{clean_headers, existing_len, ser};
use crate::repository::{HistoryRepository, StorageError};

/// Append-only CSV table of finished quiz results.
///
/// The header row is written only when the file is created (or found empty);
/// existing rows are never rewritten.
#[derive(Debug, Clone)]
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encode_record(record: &HistoryRecord, with_header: bool) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.serialize(record).map_err(ser)?;
    writer.into_inner().map_err(ser)
}

/// Whether the last byte of a non-empty file is a line feed.
async fn ends_with_newline(path: &Path, len: u64) -> Result<bool, StorageError> {
    let mut file = tokio::fs::File::open(path).await?;
    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

fn decode_records(bytes: &[u8]) -> Result<Vec<HistoryRecord>, StorageError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);
    let headers = clean_headers(reader.headers().map_err(ser)?);
    reader.set_headers(headers);
    reader
        .deserialize::<HistoryRecord>()
        .map(|row| row.map_err(ser))
        .collect()
}

#[async_trait]
impl HistoryRepository for CsvHistoryStore {
    async fn append_record(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let existing = existing_len(&self.path).await?;
        let create = matches!(existing, None | Some(0));
        let mut bytes = encode_record(record, create)?;
        if let Some(len) = existing.filter(|len| *len > 0) {
            // Rows saved by other tools may lack a final line break.
            if !ends_with_newline(&self.path, len).await? {
                bytes.insert(0, b'\n');
            }
        }

        if existing.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), created = create, "history row appended");
        Ok(())
    }

    async fn load_history(&self) -> Result<Option<Vec<HistoryRecord>>, StorageError> {
        if existing_len(&self.path).await?.is_none() {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.is_empty() {
            return Ok(Some(Vec::new()));
        }
        decode_records(&bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_uses_history_column_names() {
        let record = HistoryRecord {
            username: "kim".into(),
            score: 3,
            timing_summary: "1:2.0s; 2:3.5s".into(),
        };
        let bytes = encode_record(&record, true).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "이름,점수,문제별 시간\nkim,3,1:2.0s; 2:3.5s\n");

        let row_only = String::from_utf8(encode_record(&record, false).unwrap()).unwrap();
        assert_eq!(row_only, "kim,3,1:2.0s; 2:3.5s\n");
    }

    #[test]
    fn decodes_rows_written_by_other_tools() {
        let data = "\u{feff}이름,점수,문제별 시간\r\nlee,1,1:4.2s\r\n\"choi, j\",0,1:1.0s; 2:9.9s\r\n";
        let rows = decode_records(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].username, "choi, j");
        assert_eq!(rows[1].timing_summary, "1:1.0s; 2:9.9s");
    }
}
