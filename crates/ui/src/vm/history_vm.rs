use quiz_core::model::HistoryRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub username: String,
    pub score: u32,
    pub timing_summary: String,
}

impl From<&HistoryRecord> for HistoryRowVm {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            username: record.username.clone(),
            score: record.score,
            timing_summary: record.timing_summary.clone(),
        }
    }
}

/// Table of saved results, in the order they were written.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HistoryVm {
    pub rows: Vec<HistoryRowVm>,
}

impl HistoryVm {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let name_width = self
            .rows
            .iter()
            .map(|row| row.username.chars().count())
            .chain(std::iter::once(HistoryRecord::HEADERS[0].chars().count()))
            .max()
            .unwrap_or(0);
        let mut lines = vec![format!(
            "{:<name_width$}  {:>4}  {}",
            HistoryRecord::HEADERS[0],
            HistoryRecord::HEADERS[1],
            HistoryRecord::HEADERS[2]
        )];
        lines.extend(self.rows.iter().map(|row| {
            format!(
                "{:<name_width$}  {:>4}  {}",
                row.username, row.score, row.timing_summary
            )
        }));
        lines
    }
}

#[must_use]
pub fn map_history(records: &[HistoryRecord]) -> HistoryVm {
    HistoryVm {
        rows: records.iter().map(HistoryRowVm::from).collect(),
    }
}
