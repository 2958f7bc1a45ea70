mod progress;
mod registry;
mod session;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{OptionOrder, QuizAction, QuizPhase, QuizSession};
pub use view::{AnswerFeedback, QuestionView, QuizReport};
pub use workflow::{QuizLoopService, SaveOutcome};
