#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_bank;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, QuestionBankError, SessionError};
pub use question_bank::QuestionBank;

pub use sessions::{
    AnswerFeedback, OptionOrder, QuestionView, QuizAction, QuizLoopService, QuizPhase,
    QuizReport, QuizSession, SaveOutcome, SessionHandle, SessionProgress, SessionRegistry,
};
