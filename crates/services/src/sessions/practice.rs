use std::collections::BTreeMap;
use std::fmt;

use tutor_core::model::{Gradable, Score};

use super::progress::SessionProgress;
use crate::error::SessionError;

/// Where a practice session is in its answer/feedback cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeStage {
    /// Waiting for an answer to the current item.
    InProgress,
    /// The current item is graded and its explanation is visible.
    FeedbackShown,
    /// Every item has been answered.
    Summary,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub position: usize,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

/// Result of `PracticeSession::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Feedback was not showing, nothing changed.
    Ignored,
    /// Moved on to the item at this position.
    Next(usize),
    Finished,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Steps through items one at a time: answer, see feedback, advance.
///
/// Each item accepts exactly one answer. `correct_count` never exceeds the
/// number of answered items.
pub struct PracticeSession<I> {
    items: Vec<I>,
    current: usize,
    answers: BTreeMap<usize, String>,
    correct: usize,
    stage: PracticeStage,
}

impl<I: Gradable> PracticeSession<I> {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no items are provided.
    pub fn new(items: Vec<I>) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            items,
            current: 0,
            answers: BTreeMap::new(),
            correct: 0,
            stage: PracticeStage::InProgress,
        })
    }

    /// Grade `answer` against the current item and reveal its explanation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after the summary is reached and
    /// `SessionError::AlreadyAnswered` while feedback for the item is showing.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        match self.stage {
            PracticeStage::Summary => return Err(SessionError::Completed),
            PracticeStage::FeedbackShown => {
                return Err(SessionError::AlreadyAnswered {
                    position: self.current,
                });
            }
            PracticeStage::InProgress => {}
        }
        let item = self.items.get(self.current).ok_or(SessionError::Completed)?;
        if self.answers.contains_key(&self.current) {
            return Err(SessionError::AlreadyAnswered {
                position: self.current,
            });
        }

        let is_correct = item.is_correct(answer);
        let outcome = AnswerOutcome {
            position: self.current,
            is_correct,
            correct_answer: item.expected_answer().to_string(),
            explanation: item.explanation().to_string(),
        };

        self.answers.insert(self.current, answer.to_string());
        if is_correct {
            self.correct += 1;
        }
        self.stage = PracticeStage::FeedbackShown;
        Ok(outcome)
    }

    /// Leave the feedback of the current item.
    pub fn advance(&mut self) -> Advance {
        if self.stage != PracticeStage::FeedbackShown {
            return Advance::Ignored;
        }
        if self.current + 1 < self.items.len() {
            self.current += 1;
            self.stage = PracticeStage::InProgress;
            Advance::Next(self.current)
        } else {
            self.stage = PracticeStage::Summary;
            Advance::Finished
        }
    }

    #[must_use]
    pub fn stage(&self) -> PracticeStage {
        self.stage
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stage == PracticeStage::Summary
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<&str> {
        self.answers.get(&position).map(String::as_str)
    }

    /// Item on screen; on the summary this is the last item.
    #[must_use]
    pub fn current(&self) -> &I {
        &self.items[self.current]
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[must_use]
    pub fn score(&self) -> Score {
        Score::from_counts(self.correct, self.items.len())
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            position: self.current,
            total: self.items.len(),
            answered: self.answers.len(),
            correct: self.correct,
            is_complete: self.is_finished(),
        }
    }
}

impl<I> fmt::Debug for PracticeSession<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("items_len", &self.items.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("correct", &self.correct)
            .field("stage", &self.stage)
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tutor_core::model::{Question, QuestionDraft, WritingItem, WritingItemDraft};

    pub(crate) fn question(n: usize) -> Question {
        QuestionDraft {
            prompt: format!("Question {n}"),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: "B".into(),
            explanation: format!("Explanation {n}"),
            topic: Some("Conditional Sentences".into()),
            section: None,
        }
        .validate()
        .unwrap()
    }

    pub(crate) fn questions(count: usize) -> Vec<Question> {
        (1..=count).map(question).collect()
    }

    fn rewrite() -> WritingItem {
        WritingItemDraft {
            original: "He started learning English two years ago.".into(),
            hint: "He has ...".into(),
            correct_answer: "He has learned English for two years.".into(),
            explanation: "Present perfect with 'for'.".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn empty_session_returns_error() {
        let err = PracticeSession::<Question>::new(Vec::new()).unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn answer_then_advance_through_all_items() {
        let mut session = PracticeSession::new(questions(3)).unwrap();

        let outcome = session.submit_answer("B").unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.explanation, "Explanation 1");
        assert_eq!(session.stage(), PracticeStage::FeedbackShown);
        assert_eq!(session.advance(), Advance::Next(1));

        let outcome = session.submit_answer("A").unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_answer, "B");
        assert!(session.correct_count() <= session.position() + 1);
        assert_eq!(session.advance(), Advance::Next(2));

        session.submit_answer("B").unwrap();
        assert_eq!(session.advance(), Advance::Finished);
        assert!(session.is_finished());
        assert_eq!(session.correct_count(), 2);
        assert_eq!(session.answer_at(1), Some("A"));
        assert_eq!(session.score().to_string(), "6.7");
    }

    #[test]
    fn advance_without_feedback_is_a_no_op() {
        let mut session = PracticeSession::new(questions(2)).unwrap();
        assert_eq!(session.advance(), Advance::Ignored);
        assert_eq!(session.advance(), Advance::Ignored);
        assert_eq!(session.position(), 0);
        assert_eq!(session.stage(), PracticeStage::InProgress);
    }

    #[test]
    fn second_answer_to_same_item_is_rejected() {
        let mut session = PracticeSession::new(questions(2)).unwrap();
        session.submit_answer("A").unwrap();
        let err = session.submit_answer("B").unwrap_err();
        assert_eq!(err, SessionError::AlreadyAnswered { position: 0 });
        assert_eq!(session.correct_count(), 0);
    }

    #[test]
    fn finished_session_rejects_answers() {
        let mut session = PracticeSession::new(questions(1)).unwrap();
        session.submit_answer("B").unwrap();
        session.advance();
        assert_eq!(session.submit_answer("B").unwrap_err(), SessionError::Completed);
        assert_eq!(session.advance(), Advance::Ignored);
    }

    #[test]
    fn free_text_answers_ignore_case_and_outer_whitespace() {
        let mut session = PracticeSession::new(vec![rewrite()]).unwrap();
        let outcome = session
            .submit_answer("  he has learned english for two years. ")
            .unwrap();
        assert!(outcome.is_correct);
        assert_eq!(session.correct_count(), 1);
    }
}
