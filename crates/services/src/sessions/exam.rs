use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tutor_core::model::{ExamSection, Gradable, Question, Score};

use crate::error::SessionError;

/// Distinct topics carried into an exam report.
pub const MAX_REPORT_TOPICS: usize = 5;

/// Per-question marker for the exam navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Unanswered,
    Answered,
    Correct,
    Incorrect,
}

/// Graded outcome of a submitted exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamResult {
    pub score: Score,
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
    pub duration: Duration,
    /// Distinct topics in order of first appearance, at most `MAX_REPORT_TOPICS`.
    pub topics: Vec<String>,
}

/// A timed mock exam with free navigation and one atomic submission.
#[derive(Debug)]
pub struct ExamSession {
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, String>,
    started_at: DateTime<Utc>,
    result: Option<ExamResult>,
}

impl ExamSession {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(questions: Vec<Question>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            started_at,
            result: None,
        })
    }

    /// Record or replace the answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` once the exam is submitted.
    pub fn select_answer(&mut self, option: &str) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::Submitted);
        }
        self.answers.insert(self.current, option.to_string());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `index` is past the last question.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::OutOfRange {
                index,
                total: self.questions.len(),
            });
        }
        self.current = index;
        Ok(())
    }

    /// Move forward; returns `false` on the last question.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move back; returns `false` on the first question.
    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Grade every question at once. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Submitted` on a second call.
    pub fn submit(&mut self, submitted_at: DateTime<Utc>) -> Result<&ExamResult, SessionError> {
        if self.result.is_some() {
            return Err(SessionError::Submitted);
        }

        let total = self.questions.len();
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                self.answers
                    .get(index)
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count();
        let unanswered = total - self.answers.len();

        let mut topics: Vec<String> = Vec::new();
        for topic in self.questions.iter().filter_map(Question::topic) {
            if topics.len() == MAX_REPORT_TOPICS {
                break;
            }
            if !topics.iter().any(|seen| seen == topic) {
                topics.push(topic.to_string());
            }
        }

        let elapsed = submitted_at - self.started_at;
        let result = ExamResult {
            score: Score::from_counts(correct, total),
            correct,
            wrong: total - correct - unanswered,
            unanswered,
            total,
            duration: elapsed.max(Duration::zero()),
            topics,
        };
        tracing::info!(
            correct,
            total,
            score = %result.score,
            secs = result.duration.num_seconds(),
            "exam submitted"
        );
        Ok(self.result.insert(result))
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn question_status(&self, index: usize) -> QuestionStatus {
        let Some(answer) = self.answers.get(&index) else {
            return QuestionStatus::Unanswered;
        };
        if self.result.is_none() {
            return QuestionStatus::Answered;
        }
        match self.questions.get(index) {
            Some(question) if question.is_correct(answer) => QuestionStatus::Correct,
            _ => QuestionStatus::Incorrect,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answer_at(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Exam part of the current question, if the service labelled it.
    #[must_use]
    pub fn current_section(&self) -> Option<&ExamSection> {
        self.current().section()
    }
}
