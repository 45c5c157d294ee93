#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use error::{InvalidOperation, Operation, QuizError};
pub use quiz::{
    AnswerOutcome, LoadReport, LoadState, QuizLoader, QuizLoopService, QuizPhase, QuizProgress,
    QuizSession, QuizStatus,
};
