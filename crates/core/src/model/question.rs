use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question from the question bank.
///
/// Immutable once built; the answer is guaranteed to match one of the four
/// options exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    text: String,
    options: [String; 4],
    answer: String,
    difficulty: String,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank.
    /// Returns `QuestionError::AnswerNotAnOption` if `answer` is not one of `options`.
    pub fn new(
        text: impl Into<String>,
        options: [String; 4],
        answer: impl Into<String>,
        difficulty: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let answer = answer.into();
        if !options.iter().any(|option| *option == answer) {
            return Err(QuestionError::AnswerNotAnOption { answer });
        }

        Ok(Self {
            text,
            options,
            answer,
            difficulty: difficulty.into(),
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The four options in bank order.
    #[must_use]
    pub fn options(&self) -> [&str; 4] {
        [
            self.options[0].as_str(),
            self.options[1].as_str(),
            self.options[2].as_str(),
            self.options[3].as_str(),
        ]
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Exact text comparison against the stored answer.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        self.answer == choice
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("answer {answer:?} is not one of the options")]
    AnswerNotAnOption { answer: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["H2O".into(), "CO2".into(), "O2".into(), "NaCl".into()]
    }

    #[test]
    fn builds_question_with_matching_answer() {
        let q = Question::new("Water?", options(), "H2O", "easy", "Two hydrogens.").unwrap();
        assert_eq!(q.text(), "Water?");
        assert_eq!(q.options(), ["H2O", "CO2", "O2", "NaCl"]);
        assert!(q.is_correct("H2O"));
        assert!(!q.is_correct("h2o"));
        assert!(!q.is_correct(" H2O"));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new("Water?", options(), "He", "easy", "").unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerNotAnOption {
                answer: "He".into()
            }
        );
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new("   ", options(), "H2O", "easy", "").unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }
}
