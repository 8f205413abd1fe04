mod exam;
mod practice;
mod progress;
mod reading;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{FlowError, SessionError};
pub use exam::{ExamResult, ExamSession, MAX_REPORT_TOPICS, QuestionStatus};
pub use practice::{Advance, AnswerOutcome, PracticeSession, PracticeStage};
pub use progress::SessionProgress;
pub use reading::{PassageCursor, ReadingSession, WritingSession};
pub use workflow::{
    ExamController, ExamStage, GrammarVocabController, GrammarVocabStage, PartResult,
    ReadingWritingController, ReadingWritingStage,
};
