/// How a submitted answer is compared against the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMatch {
    /// Multiple choice: the chosen option must equal the answer exactly.
    Exact,
    /// Free text: surrounding whitespace and letter case are ignored.
    Relaxed,
}

impl AnswerMatch {
    #[must_use]
    pub fn matches(self, submitted: &str, expected: &str) -> bool {
        match self {
            Self::Exact => submitted == expected,
            Self::Relaxed => submitted.trim().to_lowercase() == expected.trim().to_lowercase(),
        }
    }
}

/// Anything a practice session can step through and grade.
pub trait Gradable {
    fn expected_answer(&self) -> &str;
    fn answer_match(&self) -> AnswerMatch;
    fn explanation(&self) -> &str;

    fn is_correct(&self, submitted: &str) -> bool {
        self.answer_match()
            .matches(submitted, self.expected_answer())
    }
}
