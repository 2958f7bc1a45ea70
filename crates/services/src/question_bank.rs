use std::sync::Arc;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::sync::OnceCell;
use tracing::info;

use quiz_core::model::{DifficultyFilter, Question};
use storage::repository::{QuestionSource, StorageError};

use crate::error::QuestionBankError;

/// Loads the question bank once and serves it for the rest of the process.
pub struct QuestionBank {
    source: Arc<dyn QuestionSource>,
    cache: OnceCell<Arc<[Question]>>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    /// Return the full bank, reading the source only on the first call.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::DataSource` if the source is missing,
    /// malformed or empty. A failed read is not cached.
    pub async fn load(&self) -> Result<Arc<[Question]>, QuestionBankError> {
        let questions = self
            .cache
            .get_or_try_init(|| async {
                let questions = self.source.fetch_questions().await?;
                if questions.is_empty() {
                    return Err(QuestionBankError::DataSource(StorageError::Empty));
                }
                info!(count = questions.len(), "question bank loaded");
                Ok(Arc::from(questions))
            })
            .await?;
        Ok(Arc::clone(questions))
    }

    /// Whether the bank has already been read.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }
}

impl std::fmt::Debug for QuestionBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionBank")
            .field("loaded", &self.cache.get().map(|q| q.len()))
            .finish_non_exhaustive()
    }
}

/// Difficulty tags present in `questions`, in first-seen order.
#[must_use]
pub fn distinct_difficulties(questions: &[Question]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for question in questions {
        if !tags.iter().any(|t| t == question.difficulty()) {
            tags.push(question.difficulty().to_string());
        }
    }
    tags
}

/// Draw up to `count` questions matching `filter`, in random order.
///
/// # Errors
///
/// Returns `QuestionBankError::EmptyPool` if nothing matches `filter`.
pub fn sample(
    questions: &[Question],
    filter: &DifficultyFilter,
    count: usize,
) -> Result<Vec<Question>, QuestionBankError> {
    sample_with_rng(questions, filter, count, &mut rand::rng())
}

/// Same as [`sample`] with a caller-provided random source.
///
/// Draws `min(count, pool)` questions uniformly without replacement, then
/// shuffles the drawn set independently of the draw order.
///
/// # Errors
///
/// Returns `QuestionBankError::EmptyPool` if nothing matches `filter`.
pub fn sample_with_rng<R: Rng + ?Sized>(
    questions: &[Question],
    filter: &DifficultyFilter,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Question>, QuestionBankError> {
    let pool: Vec<&Question> = questions
        .iter()
        .filter(|q| filter.matches(q.difficulty()))
        .collect();
    if pool.is_empty() {
        return Err(QuestionBankError::EmptyPool {
            filter: filter.clone(),
        });
    }

    let take = count.min(pool.len());
    let mut picked: Vec<Question> = pool
        .choose_multiple(&mut *rng, take)
        .map(|q| (*q).clone())
        .collect();
    picked.as_mut_slice().shuffle(rng);
    Ok(picked)
}
