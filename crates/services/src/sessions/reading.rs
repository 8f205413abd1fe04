use tutor_core::model::{Question, ReadingPassage, Score, WritingItem};

use super::practice::{Advance, AnswerOutcome, PracticeSession, PracticeStage};
use super::progress::SessionProgress;
use crate::error::SessionError;

/// Sentence-rewriting drill, graded with relaxed matching.
pub type WritingSession = PracticeSession<WritingItem>;

/// Passage and question coordinates of the item on screen, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassageCursor {
    pub passage: usize,
    pub passages: usize,
    pub question: usize,
    pub questions: usize,
}

/// Reading comprehension: the questions of every passage, in passage order,
/// run as one practice session.
#[derive(Debug)]
pub struct ReadingSession {
    passages: Vec<ReadingPassage>,
    // (passage index, question index within it) per flattened position
    index: Vec<(usize, usize)>,
    practice: PracticeSession<Question>,
}

impl ReadingSession {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when there are no passages.
    pub fn new(passages: Vec<ReadingPassage>) -> Result<Self, SessionError> {
        let mut index = Vec::new();
        let mut questions = Vec::new();
        for (passage_idx, passage) in passages.iter().enumerate() {
            for (question_idx, question) in passage.questions().iter().enumerate() {
                index.push((passage_idx, question_idx));
                questions.push(question.clone());
            }
        }
        let practice = PracticeSession::new(questions)?;
        Ok(Self {
            passages,
            index,
            practice,
        })
    }

    /// # Errors
    ///
    /// See [`PracticeSession::submit_answer`].
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        self.practice.submit_answer(answer)
    }

    pub fn advance(&mut self) -> Advance {
        self.practice.advance()
    }

    #[must_use]
    pub fn current_passage(&self) -> &ReadingPassage {
        let (passage, _) = self.coordinates();
        &self.passages[passage]
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        self.practice.current()
    }

    #[must_use]
    pub fn cursor(&self) -> PassageCursor {
        let (passage, question) = self.coordinates();
        PassageCursor {
            passage,
            passages: self.passages.len(),
            question,
            questions: self.passages[passage].questions().len(),
        }
    }

    #[must_use]
    pub fn passages(&self) -> &[ReadingPassage] {
        &self.passages
    }

    #[must_use]
    pub fn stage(&self) -> PracticeStage {
        self.practice.stage()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.practice.is_finished()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.practice.position()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.practice.total()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.practice.correct_count()
    }

    #[must_use]
    pub fn answer_at(&self, position: usize) -> Option<&str> {
        self.practice.answer_at(position)
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.practice.score()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.practice.progress()
    }

    fn coordinates(&self) -> (usize, usize) {
        self.index
            .get(self.practice.position())
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::practice::tests::questions;

    fn passages() -> Vec<ReadingPassage> {
        vec![
            ReadingPassage::new("First passage.", questions(2)).unwrap(),
            ReadingPassage::new("Second passage.", questions(3)).unwrap(),
        ]
    }

    #[test]
    fn walks_passages_in_order() {
        let mut session = ReadingSession::new(passages()).unwrap();
        assert_eq!(session.total(), 5);
        assert_eq!(session.current_passage().passage(), "First passage.");

        for _ in 0..2 {
            session.submit_answer("B").unwrap();
            session.advance();
        }
        assert_eq!(session.current_passage().passage(), "Second passage.");
        assert_eq!(
            session.cursor(),
            PassageCursor {
                passage: 1,
                passages: 2,
                question: 0,
                questions: 3,
            }
        );

        for _ in 0..3 {
            session.submit_answer("A").unwrap();
            session.advance();
        }
        assert!(session.is_finished());
        assert_eq!(session.correct_count(), 2);
        assert_eq!(session.score().to_string(), "4.0");
    }

    #[test]
    fn no_passages_is_empty() {
        assert_eq!(
            ReadingSession::new(Vec::new()).unwrap_err(),
            SessionError::Empty
        );
    }
}
