use quiz_core::model::HistoryRecord;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{HistoryRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryRecord, StorageError> {
    let score: i64 = row.try_get("score").map_err(ser)?;
    Ok(HistoryRecord {
        username: row.try_get("username").map_err(ser)?,
        score: u32::try_from(score)
            .map_err(|_| StorageError::Serialization(format!("invalid score: {score}")))?,
        timing_summary: row.try_get("timing_summary").map_err(ser)?,
    })
}

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn append_record(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO quiz_history (username, score, timing_summary, saved_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(&record.username)
        .bind(i64::from(record.score))
        .bind(&record.timing_summary)
        .bind(self.clock.now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_history(&self) -> Result<Option<Vec<HistoryRecord>>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT username, score, timing_summary
                FROM quiz_history
                ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // An empty table means nothing was ever saved.
        if rows.is_empty() {
            return Ok(None);
        }
        rows.iter().map(map_history_row).collect::<Result<Vec<_>, _>>().map(Some)
    }
}
