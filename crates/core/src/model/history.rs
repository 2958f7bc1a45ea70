use serde::{Deserialize, Serialize};

use super::{TimingEntry, timing_summary};

/// One row of the durable score history.
///
/// Field names serialize to the column headers of the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "이름")]
    pub username: String,
    #[serde(rename = "점수")]
    pub score: u32,
    #[serde(rename = "문제별 시간")]
    pub timing_summary: String,
}

impl HistoryRecord {
    /// Column headers in table order.
    pub const HEADERS: [&'static str; 3] = ["이름", "점수", "문제별 시간"];

    #[must_use]
    pub fn new(username: impl Into<String>, score: u32, timing_log: &[TimingEntry]) -> Self {
        Self {
            username: username.into(),
            score,
            timing_summary: timing_summary(timing_log),
        }
    }
}
