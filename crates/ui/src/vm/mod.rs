mod history_vm;
mod question_vm;
mod results_vm;
mod time_fmt;

pub use history_vm::{HistoryRowVm, HistoryVm, map_history};
pub use question_vm::{DEFAULT_DIFFICULTY_LABEL, FeedbackVm, QuestionScreenVm};
pub use results_vm::{BAR_WIDTH, LABEL_CHARS, ResultsVm, TimingRowVm, truncate_label};
pub use time_fmt::format_seconds;
