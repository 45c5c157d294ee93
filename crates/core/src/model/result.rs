use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AnswerRecord, Question, Step, StepId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many steps for a single quiz: {len}")]
    TooManySteps { len: usize },

    #[error("score ({score}) exceeds the number of steps ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Count the steps whose recorded answer matches the question's correct choice.
///
/// Steps without a loaded question or without an answer never count.
#[must_use]
pub fn score_answers(
    steps: &[Step],
    questions: &HashMap<StepId, Question>,
    answers: &AnswerRecord,
) -> usize {
    steps
        .iter()
        .filter(|step| {
            let Some(question) = questions.get(step.id()) else {
                return false;
            };
            answers
                .get(step.id())
                .is_some_and(|answer| question.is_correct(answer))
        })
        .count()
}

/// Outcome of a submitted quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    score: u32,
    total: u32,
    answered: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Build a result from already computed counts.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `QuizResultError::ScoreExceedsTotal` if the score is larger than the step count.
    pub fn from_counts(
        score: u32,
        total: u32,
        answered: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if completed_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }
        if score > total {
            return Err(QuizResultError::ScoreExceedsTotal { score, total });
        }

        Ok(Self {
            score,
            total,
            answered,
            started_at,
            completed_at,
        })
    }

    /// Score an attempt from scratch.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `QuizResultError::TooManySteps` if the step count cannot fit in `u32`.
    pub fn from_answers(
        steps: &[Step],
        questions: &HashMap<StepId, Question>,
        answers: &AnswerRecord,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        let too_many = || QuizResultError::TooManySteps { len: steps.len() };
        let total = u32::try_from(steps.len()).map_err(|_| too_many())?;
        let score = u32::try_from(score_answers(steps, questions, answers)).map_err(|_| too_many())?;
        let answered = steps
            .iter()
            .filter(|step| answers.get(step.id()).is_some())
            .count();
        let answered = u32::try_from(answered).map_err(|_| too_many())?;

        Self::from_counts(score, total, answered, started_at, completed_at)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionKind, QuestionRef};
    use crate::time::fixed_now;

    fn quiz(correct: &[&str]) -> (Vec<Step>, HashMap<StepId, Question>) {
        let mut steps = Vec::new();
        let mut questions = HashMap::new();
        for (idx, answer) in correct.iter().enumerate() {
            let id = StepId::new(format!("s{idx}"));
            steps.push(Step::new(id.clone(), QuestionRef::new(format!("q{idx}"))));
            questions.insert(
                id,
                Question::new("Q", QuestionKind::MultipleChoice, ["A", "B", "C"], *answer),
            );
        }
        (steps, questions)
    }

    #[test]
    fn counts_only_matching_answers() {
        let (steps, questions) = quiz(&["B", "B", "B"]);
        let mut answers = AnswerRecord::new();
        answers.record(StepId::new("s0"), "B");
        answers.record(StepId::new("s1"), "B");
        answers.record(StepId::new("s2"), "C");

        let result =
            QuizResult::from_answers(&steps, &questions, &answers, fixed_now(), fixed_now())
                .unwrap();

        assert_eq!(result.score(), 2);
        assert_eq!(result.total(), 3);
        assert_eq!(result.answered(), 3);
    }

    #[test]
    fn missing_question_never_counts() {
        let (steps, mut questions) = quiz(&["A", "A"]);
        questions.remove(&StepId::new("s1"));
        let mut answers = AnswerRecord::new();
        answers.record(StepId::new("s0"), "A");
        answers.record(StepId::new("s1"), "A");

        assert_eq!(score_answers(&steps, &questions, &answers), 1);
    }

    #[test]
    fn unanswered_steps_score_zero() {
        let (steps, questions) = quiz(&["A", "B"]);
        assert_eq!(score_answers(&steps, &questions, &AnswerRecord::new()), 0);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let later = fixed_now() + chrono::Duration::minutes(5);
        let err = QuizResult::from_counts(1, 2, 2, later, fixed_now()).unwrap_err();
        assert_eq!(err, QuizResultError::InvalidTimeRange);
    }

    #[test]
    fn rejects_score_above_total() {
        let err = QuizResult::from_counts(3, 2, 2, fixed_now(), fixed_now()).unwrap_err();
        assert!(matches!(err, QuizResultError::ScoreExceedsTotal { .. }));
    }
}
