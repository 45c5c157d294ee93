use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use quiz_core::model::{AnswerRecord, Question, QuizResult, Step, StepId};

use super::progress::QuizProgress;
use crate::error::{InvalidOperation, Operation, QuizError};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a loaded quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Loading finished but produced no steps. Nothing can be navigated.
    Empty,
    Active,
    Finished,
}

/// What `record_answer` did with the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded,
    /// The step has no answer control (question missing or not single choice).
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one quiz attempt.
///
/// Owns the loaded steps and questions, the current position and the answers
/// picked so far. Every operation either applies fully or returns an error
/// and leaves the session untouched.
pub struct QuizSession {
    steps: Vec<Step>,
    questions: HashMap<StepId, Question>,
    answers: AnswerRecord,
    current: usize,
    phase: QuizPhase,
    result: Option<QuizResult>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Create a session from fully loaded content.
    ///
    /// Steps without an entry in `questions` stay in the quiz but cannot be
    /// answered. An empty step list yields a session in `QuizPhase::Empty`.
    #[must_use]
    pub fn new(
        steps: Vec<Step>,
        questions: HashMap<StepId, Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let phase = if steps.is_empty() {
            QuizPhase::Empty
        } else {
            QuizPhase::Active
        };

        Self {
            steps,
            questions,
            answers: AnswerRecord::new(),
            current: 0,
            phase,
            result: None,
            started_at,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phase == QuizPhase::Empty
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }

    /// Question for the current step, if it loaded.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_step()
            .and_then(|step| self.questions.get(step.id()))
    }

    #[must_use]
    pub fn question_for(&self, step_id: &StepId) -> Option<&Question> {
        self.questions.get(step_id)
    }

    #[must_use]
    pub fn answer_for(&self, step_id: &StepId) -> Option<&str> {
        self.answers.get(step_id)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Result of the last submission, cleared by `restart`.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Number of correct answers, only available once finished.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.result.as_ref().map(QuizResult::score)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            current: self.current,
            total: self.steps.len(),
            answered: self.answers.len(),
            is_finished: self.is_finished(),
        }
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    fn ensure_navigable(&self, operation: Operation) -> Result<bool, QuizError> {
        match self.phase {
            QuizPhase::Empty => Ok(false),
            QuizPhase::Active => Ok(true),
            QuizPhase::Finished => Err(InvalidOperation::NotActive { operation }.into()),
        }
    }

    /// Move to the next step. Stays put on the last step.
    ///
    /// Returns whether the position changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::NotActive` once the quiz is finished.
    pub fn advance(&mut self) -> Result<bool, QuizError> {
        if !self.ensure_navigable(Operation::Advance)? || self.current >= self.last_index() {
            return Ok(false);
        }
        self.current += 1;
        tracing::debug!(current = self.current, "advanced to next step");
        Ok(true)
    }

    /// Move to the previous step. Stays put on the first step.
    ///
    /// Returns whether the position changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::NotActive` once the quiz is finished.
    pub fn retreat(&mut self) -> Result<bool, QuizError> {
        if !self.ensure_navigable(Operation::Retreat)? || self.current == 0 {
            return Ok(false);
        }
        self.current -= 1;
        tracing::debug!(current = self.current, "moved back to previous step");
        Ok(true)
    }

    /// Record the user's choice for a step, replacing any previous one.
    ///
    /// The choice is trimmed but not checked against the question's choices.
    /// Steps whose question is missing or not single choice ignore the call.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for a quiz without steps,
    /// `InvalidOperation::NotActive` once finished and
    /// `InvalidOperation::UnknownStep` for a step outside this quiz.
    pub fn record_answer(
        &mut self,
        step_id: &StepId,
        choice: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        match self.phase {
            QuizPhase::Empty => return Err(QuizError::Empty),
            QuizPhase::Finished => {
                return Err(InvalidOperation::NotActive {
                    operation: Operation::RecordAnswer,
                }
                .into());
            }
            QuizPhase::Active => {}
        }

        if !self.steps.iter().any(|step| step.id() == step_id) {
            return Err(InvalidOperation::UnknownStep(step_id.clone()).into());
        }

        let answerable = self
            .questions
            .get(step_id)
            .is_some_and(Question::is_answerable);
        if !answerable {
            tracing::debug!(step = %step_id, "ignoring answer for step without a choice control");
            return Ok(AnswerOutcome::Ignored);
        }

        self.answers.record(step_id.clone(), choice);
        Ok(AnswerOutcome::Recorded)
    }

    /// Record a choice for the step currently shown.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::record_answer`].
    pub fn record_current_answer(&mut self, choice: &str) -> Result<AnswerOutcome, QuizError> {
        let step_id = self
            .current_step()
            .map(|step| step.id().clone())
            .ok_or(QuizError::Empty)?;
        self.record_answer(&step_id, choice)
    }

    /// Score the attempt and finish the quiz.
    ///
    /// `completed_at` should come from the services layer clock. A timestamp
    /// earlier than the start time (wall clock stepped back) is clamped to it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` for a quiz without steps,
    /// `InvalidOperation::NotActive` if already finished and
    /// `InvalidOperation::SubmitBeforeLastStep` when not on the last step.
    pub fn submit(&mut self, completed_at: DateTime<Utc>) -> Result<&QuizResult, QuizError> {
        match self.phase {
            QuizPhase::Empty => return Err(QuizError::Empty),
            QuizPhase::Finished => {
                return Err(InvalidOperation::NotActive {
                    operation: Operation::Submit,
                }
                .into());
            }
            QuizPhase::Active => {}
        }

        let last = self.last_index();
        if self.current != last {
            return Err(InvalidOperation::SubmitBeforeLastStep {
                current: self.current,
                last,
            }
            .into());
        }

        let result = QuizResult::from_answers(
            &self.steps,
            &self.questions,
            &self.answers,
            self.started_at,
            completed_at.max(self.started_at),
        )?;
        tracing::debug!(
            score = result.score(),
            total = result.total(),
            "quiz submitted"
        );

        self.phase = QuizPhase::Finished;
        Ok(&*self.result.insert(result))
    }

    /// Start over with the same content.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation::NotFinished` unless the quiz was submitted.
    pub fn restart(&mut self, started_at: DateTime<Utc>) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Finished {
            return Err(InvalidOperation::NotFinished.into());
        }

        self.answers.clear();
        self.current = 0;
        self.result = None;
        self.started_at = started_at;
        self.phase = QuizPhase::Active;
        tracing::debug!("quiz restarted");
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("steps_len", &self.steps.len())
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
