use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Seconds spent on one answered question, kept to a tenth of a second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEntry {
    question: String,
    tenths: u64,
}

impl TimingEntry {
    /// Build an entry from an elapsed duration, rounding to the nearest tenth.
    #[must_use]
    pub fn from_elapsed(question: impl Into<String>, elapsed: Duration) -> Self {
        let millis = u64::try_from(elapsed.num_milliseconds()).unwrap_or(0);
        Self {
            question: question.into(),
            tenths: millis.saturating_add(50) / 100,
        }
    }

    #[must_use]
    pub fn from_tenths(question: impl Into<String>, tenths: u64) -> Self {
        Self {
            question: question.into(),
            tenths,
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn tenths(&self) -> u64 {
        self.tenths
    }

    /// Seconds with exactly one decimal place, e.g. `"12.0"`.
    #[must_use]
    pub fn seconds_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

/// Render a timing log as `"1:3.2s; 2:12.0s"`, numbered from 1 in log order.
#[must_use]
pub fn timing_summary(entries: &[TimingEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}:{entry}s", i + 1))
        .collect::<Vec<_>>()
        .join("; ")
}
