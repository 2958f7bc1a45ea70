use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DifficultyFilter;

/// Upper bound offered to users when picking a question count.
pub const MAX_QUESTIONS_PER_SESSION: usize = 20;

/// Question count suggested when the user has not picked one.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Largest count a front-end should offer for a bank of `bank_len` questions.
#[must_use]
pub fn max_selectable_count(bank_len: usize) -> usize {
    MAX_QUESTIONS_PER_SESSION.min(bank_len)
}

/// Settings chosen before a quiz starts. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    username: String,
    difficulty: DifficultyFilter,
    question_count: usize,
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroQuestions` if `question_count` is zero.
    pub fn new(
        username: impl Into<String>,
        difficulty: DifficultyFilter,
        question_count: usize,
    ) -> Result<Self, ConfigError> {
        if question_count == 0 {
            return Err(ConfigError::ZeroQuestions);
        }
        Ok(Self {
            username: username.into().trim().to_string(),
            difficulty,
            question_count,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn difficulty(&self) -> &DifficultyFilter {
        &self.difficulty
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("question count must be at least 1")]
    ZeroQuestions,
}
