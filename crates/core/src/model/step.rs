use serde::{Deserialize, Serialize};

use crate::model::ids::{QuestionRef, StepId};

/// One position in a quiz, pointing at the question shown there.
///
/// Steps are kept in the order the content source returned them. A step whose
/// entry links no question still counts toward the quiz length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    question_ref: Option<QuestionRef>,
}

impl Step {
    #[must_use]
    pub fn new(id: StepId, question_ref: QuestionRef) -> Self {
        Self {
            id,
            question_ref: Some(question_ref),
        }
    }

    /// A step with no question link.
    #[must_use]
    pub fn unlinked(id: StepId) -> Self {
        Self {
            id,
            question_ref: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &StepId {
        &self.id
    }

    #[must_use]
    pub fn question_ref(&self) -> Option<&QuestionRef> {
        self.question_ref.as_ref()
    }
}
