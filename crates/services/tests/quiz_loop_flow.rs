use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Duration;
use quiz_core::model::{DifficultyFilter, HistoryRecord, Question, SessionConfig};
use quiz_core::time::fixed_now;
use quiz_core::{Clock, ManualClock};
use services::{
    QuestionBank, QuestionBankError, QuizAction, QuizLoopService, QuizPhase, SaveOutcome,
    SessionError,
};
use storage::repository::{HistoryRepository, InMemoryRepository, StorageError};

fn question(text: &str, difficulty: &str, answer: &str) -> Question {
    Question::new(
        text,
        ["x".into(), "y".into(), "z".into(), "w".into()],
        answer,
        difficulty,
        format!("about {text}"),
    )
    .unwrap()
}

fn two_question_bank() -> Vec<Question> {
    vec![question("A", "easy", "x"), question("B", "hard", "y")]
}

fn loop_service(repo: &InMemoryRepository, clock: Clock) -> QuizLoopService {
    let bank = Arc::new(QuestionBank::new(Arc::new(repo.clone())));
    QuizLoopService::new(clock, bank, Arc::new(repo.clone()))
}

fn config(filter: DifficultyFilter, count: usize) -> SessionConfig {
    SessionConfig::new("kim", filter, count).unwrap()
}

#[tokio::test]
async fn easy_filter_with_oversized_count_uses_pool() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.new_session();

    svc.configure_and_start(&mut session, config(DifficultyFilter::only("easy"), 5))
        .await
        .unwrap();

    assert_eq!(session.total_questions(), 1);
    assert_eq!(session.current_question().unwrap().text(), "A");

    let feedback = svc.answer(&mut session, "x").unwrap();
    assert!(feedback.correct);
    assert!(feedback.finished);
    assert_eq!(session.score(), 1);
    assert_eq!(session.phase(), QuizPhase::Finished);
}

#[tokio::test]
async fn all_filter_draws_every_question_and_finishes_regardless_of_answers() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.new_session();

    svc.configure_and_start(&mut session, config(DifficultyFilter::All, 2))
        .await
        .unwrap();

    let texts: HashSet<&str> = session.questions().iter().map(Question::text).collect();
    assert_eq!(texts, HashSet::from(["A", "B"]));

    svc.answer(&mut session, "w").unwrap();
    assert_eq!(session.phase(), QuizPhase::InProgress);
    svc.answer(&mut session, "w").unwrap();

    assert_eq!(session.phase(), QuizPhase::Finished);
    assert_eq!(session.score(), 0);
    assert_eq!(session.timing_log().len(), 2);
}

#[tokio::test]
async fn empty_pool_keeps_session_configuring() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.new_session();

    let err = svc
        .configure_and_start(&mut session, config(DifficultyFilter::only("expert"), 3))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Bank(QuestionBankError::EmptyPool { .. })
    ));
    assert_eq!(session.phase(), QuizPhase::Configuring);
}

#[tokio::test]
async fn timer_reads_advance_and_log_each_answer() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let handle = ManualClock::new(fixed_now());
    let svc = loop_service(&repo, Clock::manual(handle.clone()));
    let mut session = svc.new_session();
    svc.configure_and_start(&mut session, config(DifficultyFilter::All, 2))
        .await
        .unwrap();

    handle.advance(Duration::milliseconds(1_000));
    assert_eq!(svc.elapsed(&session), Some(Duration::milliseconds(1_000)));
    handle.advance(Duration::milliseconds(2_240));
    assert_eq!(svc.elapsed(&session), Some(Duration::milliseconds(3_240)));
    svc.answer(&mut session, "x").unwrap();

    assert_eq!(svc.elapsed(&session), Some(Duration::zero()));
    handle.advance(Duration::seconds(12));
    svc.answer(&mut session, "y").unwrap();

    let report = session.report().unwrap();
    assert_eq!(report.total, 2);
    let seconds: Vec<String> = report.timing_log.iter().map(ToString::to_string).collect();
    assert_eq!(seconds, vec!["3.2", "12.0"]);
}

#[tokio::test]
async fn save_is_at_most_once() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let handle = ManualClock::new(fixed_now());
    let svc = loop_service(&repo, Clock::manual(handle.clone()));
    let mut session = svc.new_session();
    svc.configure_and_start(&mut session, config(DifficultyFilter::only("hard"), 1))
        .await
        .unwrap();

    let err = svc.save(&mut session).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidTransition {
            action: QuizAction::Save,
            phase: QuizPhase::InProgress
        }
    ));

    handle.advance(Duration::milliseconds(4_100));
    svc.answer(&mut session, "y").unwrap();

    let first = svc.save(&mut session).await.unwrap();
    assert_eq!(
        first,
        SaveOutcome::Saved(HistoryRecord {
            username: "kim".into(),
            score: 1,
            timing_summary: "1:4.1s".into(),
        })
    );
    assert_eq!(svc.save(&mut session).await.unwrap(), SaveOutcome::AlreadySaved);

    let rows = svc.history().await.unwrap().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(session.is_saved());
}

#[tokio::test]
async fn reset_starts_an_independent_session() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.new_session();
    svc.configure_and_start(&mut session, config(DifficultyFilter::All, 2))
        .await
        .unwrap();
    let first = session.current_question().unwrap().answer().to_string();
    svc.answer(&mut session, &first).unwrap();
    svc.answer(&mut session, "w").unwrap();
    svc.save(&mut session).await.unwrap();

    session.reset().unwrap();
    assert_eq!(session.phase(), QuizPhase::Configuring);
    assert!(session.config().is_none());
    let err = svc.start(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::NotConfigured));

    svc.configure_and_start(&mut session, config(DifficultyFilter::All, 2))
        .await
        .unwrap();
    assert_eq!(session.score(), 0);
    assert_eq!(session.current_index(), 0);
    assert!(session.timing_log().is_empty());
    assert!(!session.is_saved());
    assert_eq!(repo.fetch_count(), 1);
}

/// History store that fails a fixed number of writes before succeeding.
struct FlakyHistory {
    failures_left: AtomicUsize,
    inner: InMemoryRepository,
}

#[async_trait]
impl HistoryRepository for FlakyHistory {
    async fn append_record(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(StorageError::Io("permission denied".into()));
        }
        self.inner.append_record(record).await
    }

    async fn load_history(&self) -> Result<Option<Vec<HistoryRecord>>, StorageError> {
        self.inner.load_history().await
    }
}

#[tokio::test]
async fn failed_save_can_be_retried() {
    let repo = InMemoryRepository::with_questions(two_question_bank());
    let flaky = Arc::new(FlakyHistory {
        failures_left: AtomicUsize::new(1),
        inner: InMemoryRepository::new(),
    });
    let bank = Arc::new(QuestionBank::new(Arc::new(repo.clone())));
    let svc = QuizLoopService::new(Clock::fixed(fixed_now()), bank, flaky.clone());

    let mut session = svc.new_session();
    svc.configure_and_start(&mut session, config(DifficultyFilter::only("easy"), 1))
        .await
        .unwrap();
    svc.answer(&mut session, "x").unwrap();

    let err = svc.save(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Save(StorageError::Io(_))));
    assert!(!session.is_saved());
    assert!(flaky.load_history().await.unwrap().is_none());

    assert!(matches!(
        svc.save(&mut session).await.unwrap(),
        SaveOutcome::Saved(_)
    ));
    assert_eq!(flaky.load_history().await.unwrap().unwrap().len(), 1);
}
