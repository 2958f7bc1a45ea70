use chrono::Duration;

use quiz_core::model::TimingEntry;

/// Snapshot of the current question as a front-end should present it.
///
/// `elapsed` is computed at the moment the snapshot is taken; take a new
/// snapshot to refresh the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the session.
    pub position: usize,
    pub total: usize,
    pub text: String,
    pub difficulty: String,
    pub choices: Vec<String>,
    pub elapsed: Duration,
}

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub timing: TimingEntry,
    pub finished: bool,
}

/// Final numbers of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub username: String,
    pub score: u32,
    pub total: usize,
    pub timing_log: Vec<TimingEntry>,
    pub saved: bool,
}
