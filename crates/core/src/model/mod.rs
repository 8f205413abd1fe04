mod app_settings;
mod chat;
mod exercise;
mod grading;
mod question;
mod report;
mod score;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError};
pub use chat::{Attachment, AttachmentError, AttachmentKind, ChatLog, ChatMessage, ChatRole};
pub use exercise::{ExerciseKind, PracticeKind};
pub use grading::{AnswerMatch, Gradable};
pub use question::{
    ExamSection, Question, QuestionDraft, QuestionError, ReadingPassage, WritingItem,
    WritingItemDraft,
};
pub use report::{ReportDraft, ReportMetrics};
pub use score::Score;
