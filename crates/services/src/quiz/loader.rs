use chrono::{DateTime, Utc};
use std::collections::HashMap;

use quiz_content::{ContentError, ContentSource};
use quiz_core::model::{Question, Step, StepId};

use super::session::{QuizPhase, QuizSession};

/// Everything fetched by one run of the load pipeline.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub steps: Vec<Step>,
    pub questions: HashMap<StepId, Question>,
    /// Steps whose question could not be fetched, in step order.
    pub missing: Vec<(StepId, ContentError)>,
}

impl LoadReport {
    /// True when every step has its question.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    #[must_use]
    pub fn into_session(self, started_at: DateTime<Utc>) -> QuizSession {
        QuizSession::new(self.steps, self.questions, started_at)
    }
}

/// Sequential two-phase loader: the step list first, then each question in step order.
pub struct QuizLoader;

impl QuizLoader {
    /// Fetch steps and their questions.
    ///
    /// Question fetches run one at a time. A failed fetch is recorded in
    /// `LoadReport::missing` and the remaining steps are still attempted.
    ///
    /// # Errors
    ///
    /// Returns the `ContentError` from `load_steps` if the step list cannot be fetched.
    pub async fn load(source: &dyn ContentSource) -> Result<LoadReport, ContentError> {
        let steps = source.load_steps().await.inspect_err(|err| {
            tracing::error!(error = %err, "failed to load quiz steps");
        })?;

        let mut questions = HashMap::with_capacity(steps.len());
        let mut missing = Vec::new();
        for step in &steps {
            let Some(question_ref) = step.question_ref() else {
                tracing::warn!(step = %step.id(), "step links no question; step will have no content");
                missing.push((
                    step.id().clone(),
                    ContentError::NotFound(format!("step {} links no question", step.id())),
                ));
                continue;
            };
            match source.load_question(question_ref).await {
                Ok(question) => {
                    questions.insert(step.id().clone(), question);
                }
                Err(err) => {
                    tracing::warn!(
                        step = %step.id(),
                        question = %question_ref,
                        error = %err,
                        "failed to load question; step will have no content"
                    );
                    missing.push((step.id().clone(), err));
                }
            }
        }

        tracing::info!(
            steps = steps.len(),
            missing = missing.len(),
            "quiz content loaded"
        );
        Ok(LoadReport {
            steps,
            questions,
            missing,
        })
    }
}

//
// ─── LOAD STATE ────────────────────────────────────────────────────────────────
//

/// Coarse status of the quiz as seen by a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    Loading,
    LoadFailed,
    Empty,
    Active,
    Finished,
}

/// Hosting-side wrapper that covers the time before a session exists.
#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Failed(ContentError),
    Ready(QuizSession),
}

impl LoadState {
    /// Settle the state from a finished load attempt.
    #[must_use]
    pub fn from_load(
        loaded: Result<LoadReport, ContentError>,
        started_at: DateTime<Utc>,
    ) -> Self {
        match loaded {
            Ok(report) => Self::Ready(report.into_session(started_at)),
            Err(err) => Self::Failed(err),
        }
    }

    #[must_use]
    pub fn status(&self) -> QuizStatus {
        match self {
            LoadState::Loading => QuizStatus::Loading,
            LoadState::Failed(_) => QuizStatus::LoadFailed,
            LoadState::Ready(session) => match session.phase() {
                QuizPhase::Empty => QuizStatus::Empty,
                QuizPhase::Active => QuizStatus::Active,
                QuizPhase::Finished => QuizStatus::Finished,
            },
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match self {
            LoadState::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        match self {
            LoadState::Ready(session) => Some(session),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_content::InMemoryContentSource;
    use quiz_core::model::{QuestionKind, QuestionRef};
    use quiz_core::time::fixed_now;

    fn seeded(count: usize) -> InMemoryContentSource {
        let source = InMemoryContentSource::new();
        for idx in 0..count {
            source
                .push_step(
                    Step::new(
                        StepId::new(format!("s{idx}")),
                        QuestionRef::new(format!("q{idx}")),
                    ),
                    Question::new(format!("Q{idx}"), QuestionKind::MultipleChoice, ["A"], "A"),
                )
                .unwrap();
        }
        source
    }

    #[tokio::test]
    async fn fetches_questions_in_step_order() {
        let source = seeded(3);

        let report = QuizLoader::load(&source).await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.questions.len(), 3);
        let fetched: Vec<_> = source
            .fetched_questions()
            .unwrap()
            .iter()
            .map(|r| r.as_str().to_owned())
            .collect();
        assert_eq!(fetched, ["q0", "q1", "q2"]);
    }

    #[tokio::test]
    async fn failed_question_does_not_stop_the_batch() {
        let source = seeded(3);
        source.fail_question(QuestionRef::new("q1")).unwrap();

        let report = QuizLoader::load(&source).await.unwrap();

        assert_eq!(report.questions.len(), 2);
        assert!(report.questions.contains_key(&StepId::new("s2")));
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].0, StepId::new("s1"));
        assert_eq!(source.fetched_questions().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unlinked_step_is_kept_and_reported_missing() {
        let source = seeded(2);
        source
            .push_dangling_step(Step::unlinked(StepId::new("orphan")))
            .unwrap();

        let report = QuizLoader::load(&source).await.unwrap();

        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].0, StepId::new("orphan"));
        assert!(matches!(report.missing[0].1, ContentError::NotFound(_)));
        assert_eq!(source.fetched_questions().unwrap().len(), 2);

        let session = report.into_session(fixed_now());
        assert_eq!(session.progress().total, 3);
    }

    #[tokio::test]
    async fn step_failure_leaves_state_failed() {
        let source = seeded(2);
        source.fail_steps(true).unwrap();

        let state = LoadState::from_load(QuizLoader::load(&source).await, fixed_now());

        assert_eq!(state.status(), QuizStatus::LoadFailed);
        assert!(state.session().is_none());
        assert!(source.fetched_questions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_steps_reports_empty() {
        let source = seeded(0);

        let state = LoadState::from_load(QuizLoader::load(&source).await, fixed_now());

        assert_eq!(state.status(), QuizStatus::Empty);
    }

    #[test]
    fn default_state_is_loading() {
        assert_eq!(LoadState::default().status(), QuizStatus::Loading);
    }
}
