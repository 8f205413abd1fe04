use chrono::{DateTime, Utc};
use tutor_core::model::{
    ExerciseKind, PracticeKind, Question, ReadingPassage, ReportMetrics, Score, WritingItem,
};

use super::exam::{ExamResult, ExamSession};
use super::practice::{Advance, AnswerOutcome, PracticeSession};
use super::reading::{ReadingSession, WritingSession};
use crate::error::{FlowError, SessionError};
use crate::question_bank::QuestionBank;

//
// ─── GRAMMAR / VOCABULARY ──────────────────────────────────────────────────────
//

/// Screen the grammar/vocabulary drill is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarVocabStage {
    Selection,
    TopicPick,
    Practice,
    Summary,
}

#[derive(Debug)]
enum GrammarVocabState {
    Selection,
    TopicPick {
        kind: PracticeKind,
        topics: Vec<String>,
    },
    Practice {
        kind: PracticeKind,
        topics: Vec<String>,
        topic: String,
        session: PracticeSession<Question>,
    },
}

/// Drives kind selection, topic choice and a practice run over fetched questions.
///
/// A failed or empty fetch leaves the controller on the screen it was on.
#[derive(Debug)]
pub struct GrammarVocabController {
    state: GrammarVocabState,
}

impl Default for GrammarVocabController {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarVocabController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: GrammarVocabState::Selection,
        }
    }

    #[must_use]
    pub fn stage(&self) -> GrammarVocabStage {
        match &self.state {
            GrammarVocabState::Selection => GrammarVocabStage::Selection,
            GrammarVocabState::TopicPick { .. } => GrammarVocabStage::TopicPick,
            GrammarVocabState::Practice { session, .. } if session.is_finished() => {
                GrammarVocabStage::Summary
            }
            GrammarVocabState::Practice { .. } => GrammarVocabStage::Practice,
        }
    }

    #[must_use]
    pub fn kind(&self) -> Option<PracticeKind> {
        match &self.state {
            GrammarVocabState::Selection => None,
            GrammarVocabState::TopicPick { kind, .. } | GrammarVocabState::Practice { kind, .. } => {
                Some(*kind)
            }
        }
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        match &self.state {
            GrammarVocabState::Selection => &[],
            GrammarVocabState::TopicPick { topics, .. }
            | GrammarVocabState::Practice { topics, .. } => topics.as_slice(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        match &self.state {
            GrammarVocabState::Practice { topic, .. } => Some(topic.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&PracticeSession<Question>> {
        match &self.state {
            GrammarVocabState::Practice { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Fetch topics for `kind` and move to the topic list.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Fetch` on request failure and
    /// `FlowError::NothingAvailable` when no topics came back.
    pub async fn choose_kind(
        &mut self,
        bank: &QuestionBank,
        kind: PracticeKind,
    ) -> Result<(), FlowError> {
        let topics = bank.topics(kind).await?;
        if topics.is_empty() {
            return Err(FlowError::NothingAvailable);
        }
        self.state = GrammarVocabState::TopicPick { kind, topics };
        Ok(())
    }

    /// Fetch a fresh question set for `topic`, replacing any previous run.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStage` before a kind is chosen,
    /// `FlowError::Fetch` on request failure and `FlowError::NothingAvailable`
    /// for an empty set. The controller stays where it was on error.
    pub async fn select_topic(&mut self, bank: &QuestionBank, topic: &str) -> Result<(), FlowError> {
        let kind = self.kind().ok_or(FlowError::WrongStage)?;
        let questions = bank.topic_questions(kind, topic).await?;
        if questions.is_empty() {
            return Err(FlowError::NothingAvailable);
        }
        let session = PracticeSession::new(questions)?;
        let topics = self.topics().to_vec();
        self.state = GrammarVocabState::Practice {
            kind,
            topics,
            topic: topic.to_string(),
            session,
        };
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `FlowError::WrongStage` outside a practice run, or the session's error.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, FlowError> {
        match &mut self.state {
            GrammarVocabState::Practice { session, .. } => Ok(session.submit_answer(answer)?),
            _ => Err(FlowError::WrongStage),
        }
    }

    pub fn advance(&mut self) -> Advance {
        match &mut self.state {
            GrammarVocabState::Practice { session, .. } => session.advance(),
            _ => Advance::Ignored,
        }
    }

    /// Return to the topic list, discarding the current run.
    pub fn back_to_topics(&mut self) {
        let state = std::mem::replace(&mut self.state, GrammarVocabState::Selection);
        self.state = match state {
            GrammarVocabState::Practice { kind, topics, .. } => {
                GrammarVocabState::TopicPick { kind, topics }
            }
            other => other,
        };
    }

    pub fn back_to_selection(&mut self) {
        self.state = GrammarVocabState::Selection;
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the summary.
    pub fn report_request(&self) -> Result<ReportMetrics, FlowError> {
        match &self.state {
            GrammarVocabState::Practice {
                kind,
                topic,
                session,
                ..
            } if session.is_finished() => {
                let exercise = ExerciseKind::GrammarVocab {
                    kind: *kind,
                    topic: topic.clone(),
                };
                Ok(ReportMetrics::new(
                    exercise.report_label(),
                    session.correct_count(),
                    session.total(),
                    vec![topic.clone()],
                ))
            }
            _ => Err(SessionError::NotFinished.into()),
        }
    }
}

//
// ─── READING / WRITING ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingWritingStage {
    Selection,
    Reading,
    Writing,
    Summary,
}

/// Correct answers out of total for one finished part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartResult {
    pub correct: usize,
    pub total: usize,
}

/// Reading and rewriting parts, each loaded once and re-run on demand.
#[derive(Debug)]
pub struct ReadingWritingController {
    stage: ReadingWritingStage,
    passages: Option<Vec<ReadingPassage>>,
    items: Option<Vec<WritingItem>>,
    reading: Option<ReadingSession>,
    writing: Option<WritingSession>,
    reading_result: Option<PartResult>,
    writing_result: Option<PartResult>,
}

impl Default for ReadingWritingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingWritingController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stage: ReadingWritingStage::Selection,
            passages: None,
            items: None,
            reading: None,
            writing: None,
            reading_result: None,
            writing_result: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> ReadingWritingStage {
        self.stage
    }

    #[must_use]
    pub fn reading(&self) -> Option<&ReadingSession> {
        self.reading.as_ref()
    }

    #[must_use]
    pub fn writing(&self) -> Option<&WritingSession> {
        self.writing.as_ref()
    }

    #[must_use]
    pub fn reading_finished(&self) -> bool {
        self.reading_result.is_some()
    }

    #[must_use]
    pub fn writing_finished(&self) -> bool {
        self.writing_result.is_some()
    }

    /// Start the reading part, fetching passages on first entry.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Fetch` or `FlowError::NothingAvailable`; the stage is unchanged.
    pub async fn start_reading(&mut self, bank: &QuestionBank) -> Result<(), FlowError> {
        if self.passages.is_none() {
            let fetched = bank.reading_passages().await?;
            if fetched.is_empty() {
                return Err(FlowError::NothingAvailable);
            }
            self.passages = Some(fetched);
        }
        let passages = self.passages.clone().unwrap_or_default();
        self.reading = Some(ReadingSession::new(passages)?);
        self.stage = ReadingWritingStage::Reading;
        Ok(())
    }

    /// Start the rewriting part, fetching items on first entry.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Fetch` or `FlowError::NothingAvailable`; the stage is unchanged.
    pub async fn start_writing(&mut self, bank: &QuestionBank) -> Result<(), FlowError> {
        if self.items.is_none() {
            let fetched = bank.writing_items().await?;
            if fetched.is_empty() {
                return Err(FlowError::NothingAvailable);
            }
            self.items = Some(fetched);
        }
        let items = self.items.clone().unwrap_or_default();
        self.writing = Some(PracticeSession::new(items)?);
        self.stage = ReadingWritingStage::Writing;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `FlowError::WrongStage` outside a running part, or the session's error.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, FlowError> {
        match (self.stage, &mut self.reading, &mut self.writing) {
            (ReadingWritingStage::Reading, Some(session), _) => Ok(session.submit_answer(answer)?),
            (ReadingWritingStage::Writing, _, Some(session)) => Ok(session.submit_answer(answer)?),
            _ => Err(FlowError::WrongStage),
        }
    }

    /// Leave feedback; finishing a part records its result and returns to selection.
    pub fn advance(&mut self) -> Advance {
        let advance = match (self.stage, &mut self.reading, &mut self.writing) {
            (ReadingWritingStage::Reading, Some(session), _) => session.advance(),
            (ReadingWritingStage::Writing, _, Some(session)) => session.advance(),
            _ => Advance::Ignored,
        };
        if advance == Advance::Finished {
            match self.stage {
                ReadingWritingStage::Reading => {
                    self.reading_result = self.reading.as_ref().map(|session| PartResult {
                        correct: session.correct_count(),
                        total: session.total(),
                    });
                }
                ReadingWritingStage::Writing => {
                    self.writing_result = self.writing.as_ref().map(|session| PartResult {
                        correct: session.correct_count(),
                        total: session.total(),
                    });
                }
                ReadingWritingStage::Selection | ReadingWritingStage::Summary => {}
            }
            self.stage = ReadingWritingStage::Selection;
        }
        advance
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` until at least one part is finished.
    pub fn show_summary(&mut self) -> Result<(), FlowError> {
        if self.combined().is_none() {
            return Err(SessionError::NotFinished.into());
        }
        self.stage = ReadingWritingStage::Summary;
        Ok(())
    }

    pub fn back_to_selection(&mut self) {
        self.stage = ReadingWritingStage::Selection;
    }

    /// Correct/total over every finished part.
    #[must_use]
    pub fn combined(&self) -> Option<PartResult> {
        let parts = [self.reading_result, self.writing_result];
        parts.into_iter().flatten().reduce(|acc, part| PartResult {
            correct: acc.correct + part.correct,
            total: acc.total + part.total,
        })
    }

    #[must_use]
    pub fn combined_score(&self) -> Option<Score> {
        self.combined()
            .map(|part| Score::from_counts(part.correct, part.total))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` until at least one part is finished.
    pub fn report_request(&self) -> Result<ReportMetrics, FlowError> {
        let combined = self.combined().ok_or(SessionError::NotFinished)?;
        let mut topics = Vec::new();
        if self.reading_finished() {
            topics.push("Reading comprehension".to_string());
        }
        if self.writing_finished() {
            topics.push("Sentence rewriting".to_string());
        }
        Ok(ReportMetrics::new(
            ExerciseKind::ReadingWriting.report_label(),
            combined.correct,
            combined.total,
            topics,
        ))
    }
}

//
// ─── FULL EXAM ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamStage {
    NotStarted,
    InProgress,
    ConfirmingSubmit,
    Submitted,
}

/// Fetches a mock exam and guards submission behind an explicit confirmation.
#[derive(Debug, Default)]
pub struct ExamController {
    session: Option<ExamSession>,
    confirming: bool,
}

impl ExamController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> ExamStage {
        match &self.session {
            None => ExamStage::NotStarted,
            Some(session) if session.is_submitted() => ExamStage::Submitted,
            Some(_) if self.confirming => ExamStage::ConfirmingSubmit,
            Some(_) => ExamStage::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&ExamSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut ExamSession> {
        self.session.as_mut()
    }

    /// Fetch a full exam and start the clock.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Fetch` or `FlowError::NothingAvailable`; an exam in
    /// progress is left untouched.
    pub async fn start(
        &mut self,
        bank: &QuestionBank,
        started_at: DateTime<Utc>,
    ) -> Result<(), FlowError> {
        let questions = bank.full_exam().await?;
        if questions.is_empty() {
            return Err(FlowError::NothingAvailable);
        }
        self.session = Some(ExamSession::new(questions, started_at)?);
        self.confirming = false;
        Ok(())
    }

    /// Ask for confirmation before grading.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongStage` unless the exam is in progress.
    pub fn request_submit(&mut self) -> Result<(), FlowError> {
        if self.stage() != ExamStage::InProgress {
            return Err(FlowError::WrongStage);
        }
        self.confirming = true;
        Ok(())
    }

    pub fn cancel_submit(&mut self) {
        self.confirming = false;
    }

    /// # Errors
    ///
    /// Returns `FlowError::WrongStage` unless confirmation was requested.
    pub fn confirm_submit(&mut self, submitted_at: DateTime<Utc>) -> Result<&ExamResult, FlowError> {
        if self.stage() != ExamStage::ConfirmingSubmit {
            return Err(FlowError::WrongStage);
        }
        self.confirming = false;
        let session = self.session.as_mut().ok_or(FlowError::WrongStage)?;
        Ok(session.submit(submitted_at)?)
    }

    #[must_use]
    pub fn result(&self) -> Option<&ExamResult> {
        self.session.as_ref().and_then(ExamSession::result)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before submission.
    pub fn report_request(&self) -> Result<ReportMetrics, FlowError> {
        let result = self.result().ok_or(SessionError::NotFinished)?;
        Ok(ReportMetrics::new(
            ExerciseKind::FullExam.report_label(),
            result.correct,
            result.total,
            result.topics.clone(),
        ))
    }
}
