use serde::{Deserialize, Serialize};

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// How a question is answered.
///
/// Only `MultipleChoice` has an answer control. Any other label coming from the
/// content store is preserved verbatim so it can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Pick exactly one of the listed choices.
    MultipleChoice,
    /// A type this engine does not render controls for.
    Other(String),
}

impl QuestionKind {
    /// Label used by the content store for single-choice questions.
    pub const MULTIPLE_CHOICE_LABEL: &'static str = "multiple choice";

    /// Maps a content-store label to a kind.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::MULTIPLE_CHOICE_LABEL | "multipleChoice" => Self::MultipleChoice,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn is_answerable(&self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Prompt, choices and expected answer for a single step.
///
/// Choices and the correct choice are trimmed on construction, so scoring can
/// compare strings exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    kind: QuestionKind,
    choices: Vec<String>,
    correct_choice: String,
}

impl Question {
    /// Build a question from already separated choices.
    ///
    /// Blank choices are dropped; duplicates are kept in order.
    #[must_use]
    pub fn new<I, S>(
        text: impl Into<String>,
        kind: QuestionKind,
        choices: I,
        correct_choice: impl AsRef<str>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let choices = choices
            .into_iter()
            .map(|choice| choice.as_ref().trim().to_owned())
            .filter(|choice| !choice.is_empty())
            .collect();

        Self {
            text: text.into(),
            kind,
            choices,
            correct_choice: correct_choice.as_ref().trim().to_owned(),
        }
    }

    /// Build a question whose choices arrive as one comma-separated string.
    #[must_use]
    pub fn from_answer_list(
        text: impl Into<String>,
        kind: QuestionKind,
        answers: &str,
        correct_choice: impl AsRef<str>,
    ) -> Self {
        Self::new(text, kind, answers.split(','), correct_choice)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn correct_choice(&self) -> &str {
        &self.correct_choice
    }

    /// Whether the question has an interactive answer control.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        self.kind.is_answerable()
    }

    /// Exact, case-sensitive comparison against the trimmed answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_choice
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_content_labels() {
        assert_eq!(
            QuestionKind::from_label("multiple choice"),
            QuestionKind::MultipleChoice
        );
        assert_eq!(
            QuestionKind::from_label(" multipleChoice "),
            QuestionKind::MultipleChoice
        );
        assert_eq!(
            QuestionKind::from_label("free text"),
            QuestionKind::Other("free text".into())
        );
    }

    #[test]
    fn answer_list_is_split_and_trimmed() {
        let question = Question::from_answer_list(
            "Capital of France?",
            QuestionKind::MultipleChoice,
            "Paris, Lyon ,Nice,",
            "Paris",
        );

        assert_eq!(question.choices(), ["Paris", "Lyon", "Nice"]);
    }

    #[test]
    fn duplicate_choices_are_kept() {
        let question = Question::new("Q", QuestionKind::MultipleChoice, ["A", "A", "B"], "A");
        assert_eq!(question.choices(), ["A", "A", "B"]);
    }

    #[test]
    fn correct_choice_is_normalized() {
        let question = Question::new("Q", QuestionKind::MultipleChoice, ["A", "B"], "  B ");

        assert_eq!(question.correct_choice(), "B");
        assert!(question.is_correct("B"));
        assert!(question.is_correct(" B"));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let question = Question::new("Q", QuestionKind::MultipleChoice, ["Yes", "No"], "Yes");
        assert!(!question.is_correct("yes"));
    }

    #[test]
    fn other_kinds_are_not_answerable() {
        let question = Question::new("Q", QuestionKind::Other("essay".into()), ["x"], "x");
        assert!(!question.is_answerable());
    }
}
