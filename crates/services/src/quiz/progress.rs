/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// Zero-based index of the step being shown.
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub is_finished: bool,
}

impl QuizProgress {
    /// One-based position for display, `0` when the quiz has no steps.
    #[must_use]
    pub fn position(&self) -> usize {
        if self.total == 0 { 0 } else { self.current + 1 }
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.total > 0 && self.current + 1 == self.total
    }
}
