use async_trait::async_trait;
use quiz_core::model::{Question, QuestionRef, Step};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by content sources.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("content not found: {0}")]
    NotFound(String),

    #[error("content source is not configured")]
    NotConfigured,
}

/// Read-only contract for where quiz content comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the ordered list of quiz steps.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` on network, auth or decode failures.
    async fn load_steps(&self) -> Result<Vec<Step>, ContentError>;

    /// Resolve a single question by reference.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NotFound` if the reference does not resolve,
    /// or `ContentError::SourceUnavailable` if the source cannot be reached.
    async fn load_question(&self, question_ref: &QuestionRef) -> Result<Question, ContentError>;
}

/// In-memory content source for tests, demos and prototyping.
///
/// Failures can be injected per call so loading behaviour can be exercised
/// without a network.
#[derive(Clone, Default)]
pub struct InMemoryContentSource {
    steps: Arc<Mutex<Vec<Step>>>,
    questions: Arc<Mutex<HashMap<QuestionRef, Question>>>,
    failing_questions: Arc<Mutex<HashSet<QuestionRef>>>,
    steps_unavailable: Arc<Mutex<bool>>,
    fetch_log: Arc<Mutex<Vec<QuestionRef>>>,
}

impl InMemoryContentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step together with the question it references.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` if the internal lock is poisoned.
    pub fn push_step(&self, step: Step, question: Question) -> Result<(), ContentError> {
        if let Some(question_ref) = step.question_ref() {
            lock(&self.questions)?.insert(question_ref.clone(), question);
        }
        lock(&self.steps)?.push(step);
        Ok(())
    }

    /// Append a step whose question reference is missing or resolves to nothing.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` if the internal lock is poisoned.
    pub fn push_dangling_step(&self, step: Step) -> Result<(), ContentError> {
        lock(&self.steps)?.push(step);
        Ok(())
    }

    /// Make every `load_steps` call fail as if the network were down.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` if the internal lock is poisoned.
    pub fn fail_steps(&self, unavailable: bool) -> Result<(), ContentError> {
        *lock(&self.steps_unavailable)? = unavailable;
        Ok(())
    }

    /// Make lookups of one question fail with `SourceUnavailable`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` if the internal lock is poisoned.
    pub fn fail_question(&self, question_ref: QuestionRef) -> Result<(), ContentError> {
        lock(&self.failing_questions)?.insert(question_ref);
        Ok(())
    }

    /// References passed to `load_question`, in call order.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SourceUnavailable` if the internal lock is poisoned.
    pub fn fetched_questions(&self) -> Result<Vec<QuestionRef>, ContentError> {
        Ok(lock(&self.fetch_log)?.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, ContentError> {
    mutex
        .lock()
        .map_err(|e| ContentError::SourceUnavailable(e.to_string()))
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn load_steps(&self) -> Result<Vec<Step>, ContentError> {
        if *lock(&self.steps_unavailable)? {
            return Err(ContentError::SourceUnavailable("steps offline".into()));
        }
        Ok(lock(&self.steps)?.clone())
    }

    async fn load_question(&self, question_ref: &QuestionRef) -> Result<Question, ContentError> {
        lock(&self.fetch_log)?.push(question_ref.clone());
        if lock(&self.failing_questions)?.contains(question_ref) {
            return Err(ContentError::SourceUnavailable(format!(
                "question {question_ref} offline"
            )));
        }
        lock(&self.questions)?
            .get(question_ref)
            .cloned()
            .ok_or_else(|| ContentError::NotFound(question_ref.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionKind, StepId};

    fn step(id: &str) -> Step {
        Step::new(StepId::new(id), QuestionRef::new(format!("q-{id}")))
    }

    fn question() -> Question {
        Question::new("Q", QuestionKind::MultipleChoice, ["A", "B"], "A")
    }

    #[tokio::test]
    async fn returns_steps_in_insertion_order() {
        let source = InMemoryContentSource::new();
        source.push_step(step("b"), question()).unwrap();
        source.push_step(step("a"), question()).unwrap();

        let steps = source.load_steps().await.unwrap();
        let ids: Vec<_> = steps.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[tokio::test]
    async fn dangling_reference_is_not_found() {
        let source = InMemoryContentSource::new();
        source.push_dangling_step(step("x")).unwrap();

        let err = source
            .load_question(&QuestionRef::new("q-x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn injected_failures_surface_as_unavailable() {
        let source = InMemoryContentSource::new();
        source.push_step(step("a"), question()).unwrap();
        source.fail_steps(true).unwrap();
        source.fail_question(QuestionRef::new("q-a")).unwrap();

        assert!(matches!(
            source.load_steps().await,
            Err(ContentError::SourceUnavailable(_))
        ));
        assert!(matches!(
            source.load_question(&QuestionRef::new("q-a")).await,
            Err(ContentError::SourceUnavailable(_))
        ));
    }
}
