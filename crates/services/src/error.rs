//! Shared error types for the services crate.

use std::fmt;

use thiserror::Error;

use quiz_content::ContentError;
use quiz_core::model::{QuizResultError, StepId};

/// Engine operations, used to describe rejected calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Advance,
    Retreat,
    RecordAnswer,
    Submit,
    Restart,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Advance => "advance",
            Operation::Retreat => "retreat",
            Operation::RecordAnswer => "record_answer",
            Operation::Submit => "submit",
            Operation::Restart => "restart",
        };
        f.write_str(name)
    }
}

/// Reasons an engine operation was refused. State is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidOperation {
    #[error("{operation} is only allowed while the quiz is active")]
    NotActive { operation: Operation },
    #[error("restart is only allowed after the quiz is finished")]
    NotFinished,
    #[error("submit is only allowed on the last step (at {current}, last is {last})")]
    SubmitBeforeLastStep { current: usize, last: usize },
    #[error("step {0} is not part of this quiz")]
    UnknownStep(StepId),
}

/// Errors emitted by quiz services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no steps")]
    Empty,
    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
    #[error(transparent)]
    Result(#[from] QuizResultError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
