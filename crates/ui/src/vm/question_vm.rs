use services::{AnswerFeedback, QuestionView};

use crate::vm::time_fmt::format_seconds;

/// Caption shown when a question carries no difficulty tag.
pub const DEFAULT_DIFFICULTY_LABEL: &str = "보통";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionScreenVm {
    pub heading: String,
    pub difficulty_caption: String,
    pub elapsed_line: String,
    pub choices: Vec<String>,
}

impl From<&QuestionView> for QuestionScreenVm {
    fn from(view: &QuestionView) -> Self {
        let difficulty = if view.difficulty.trim().is_empty() {
            DEFAULT_DIFFICULTY_LABEL
        } else {
            view.difficulty.as_str()
        };
        Self {
            heading: format!("문제 {}/{}: {}", view.position, view.total, view.text),
            difficulty_caption: format!("📶 난이도: {difficulty}"),
            elapsed_line: format!("⏱️ 경과 시간: {}초", format_seconds(view.elapsed)),
            choices: view.choices.clone(),
        }
    }
}

impl QuestionScreenVm {
    /// Screen lines, choices numbered from 1.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.heading.clone(),
            self.difficulty_caption.clone(),
            self.elapsed_line.clone(),
        ];
        lines.extend(
            self.choices
                .iter()
                .enumerate()
                .map(|(i, choice)| format!("  {}) {choice}", i + 1)),
        );
        lines
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub verdict: String,
    pub explanation: String,
}

impl From<&AnswerFeedback> for FeedbackVm {
    fn from(feedback: &AnswerFeedback) -> Self {
        let verdict = if feedback.correct {
            "정답입니다!".to_string()
        } else {
            format!("오답입니다. 정답: {}", feedback.correct_answer)
        };
        Self {
            verdict,
            explanation: format!("📘 해설: {}", feedback.explanation),
        }
    }
}
