#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod chat;
pub mod error;
pub mod prompts;
pub mod question_bank;
pub mod recording;
pub mod report;
pub mod sessions;

pub use tutor_core::Clock;

pub use app_services::AppServices;
pub use chat::{ChatService, ChatSession, TutorRequest};
pub use error::{
    CaptureError, ChatError, FlowError, GenerationError, QuestionBankError, ReportError,
    SessionError,
};
pub use question_bank::QuestionBank;
pub use recording::{CapturedAudio, Microphone, Opened, RecorderNotice, StopRequest, VoiceRecorder};
pub use report::{ReportComposer, ReportOutbox, SentReport};
