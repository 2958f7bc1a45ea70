mod config;
mod difficulty;
mod history;
mod ids;
mod question;
mod timing;

pub use config::{
    ConfigError, DEFAULT_QUESTION_COUNT, MAX_QUESTIONS_PER_SESSION, SessionConfig,
    max_selectable_count,
};
pub use difficulty::DifficultyFilter;
pub use history::HistoryRecord;
pub use ids::SessionId;
pub use question::{Question, QuestionError};
pub use timing::{TimingEntry, timing_summary};
