mod loader;
mod progress;
mod session;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use loader::{LoadReport, LoadState, QuizLoader, QuizStatus};
pub use progress::QuizProgress;
pub use session::{AnswerOutcome, QuizPhase, QuizSession};
pub use workflow::QuizLoopService;
