use std::sync::Arc;

use quiz_content::ContentSource;
use quiz_core::model::QuizResult;

use super::loader::{LoadReport, LoadState, QuizLoader};
use super::session::QuizSession;
use crate::Clock;
use crate::error::QuizError;

/// Orchestrates quiz loading and the time-stamped transitions.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn ContentSource>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn ContentSource>) -> Self {
        Self { clock, source }
    }

    /// Run the load pipeline and report what was fetched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Content` if the step list cannot be loaded.
    pub async fn load(&self) -> Result<LoadReport, QuizError> {
        Ok(QuizLoader::load(self.source.as_ref()).await?)
    }

    /// Load content and start a session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Content` if the step list cannot be loaded.
    pub async fn start(&self) -> Result<QuizSession, QuizError> {
        let report = self.load().await?;
        Ok(report.into_session(self.clock.now()))
    }

    /// Load content and settle it into a `LoadState` for the presentation layer.
    pub async fn load_state(&self) -> LoadState {
        let loaded = QuizLoader::load(self.source.as_ref()).await;
        LoadState::from_load(loaded, self.clock.now())
    }

    /// Submit the session, stamping the completion time from the clock.
    ///
    /// # Errors
    ///
    /// Propagates the rejection from [`QuizSession::submit`].
    pub fn submit(&self, session: &mut QuizSession) -> Result<QuizResult, QuizError> {
        session.submit(self.clock.now()).cloned()
    }

    /// Restart a finished session, stamping a new start time.
    ///
    /// # Errors
    ///
    /// Propagates the rejection from [`QuizSession::restart`].
    pub fn restart(&self, session: &mut QuizSession) -> Result<(), QuizError> {
        session.restart(self.clock.now())
    }
}
