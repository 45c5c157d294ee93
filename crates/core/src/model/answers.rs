use std::collections::HashMap;

use crate::model::ids::StepId;

/// Choices the user has picked so far, at most one per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    answers: HashMap<StepId, String>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the trimmed choice for a step, replacing any earlier one.
    pub fn record(&mut self, step_id: StepId, choice: &str) {
        self.answers.insert(step_id, choice.trim().to_owned());
    }

    #[must_use]
    pub fn get(&self, step_id: &StepId) -> Option<&str> {
        self.answers.get(step_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}
