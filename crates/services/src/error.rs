//! Shared error types for the services crate.

use thiserror::Error;

use tutor_core::model::AttachmentError;

/// Errors emitted by a `GenerationClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generation service is not configured")]
    Disabled,
    #[error("generation service returned an empty response")]
    EmptyResponse,
    #[error("generation service blocked the request: {0}")]
    Blocked(String),
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuestionBank`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("malformed {what} payload: {reason}")]
    Malformed { what: &'static str, reason: String },
}

/// Errors emitted by `ReportComposer`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("report text came back empty")]
    Empty,
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors emitted by the tutor chat.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("a tutor reply is still pending")]
    Busy,
    #[error("nothing to send")]
    EmptyTurn,
    #[error("no turn is pending")]
    NoPendingTurn,
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors emitted by a `Microphone` or the `VoiceRecorder`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CaptureError {
    #[error("microphone permission was denied")]
    PermissionDenied,
    #[error("microphone unavailable: {0}")]
    Unavailable(String),
    #[error("already recording")]
    AlreadyRecording,
    #[error("not recording")]
    NotRecording,
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

/// Errors emitted by in-memory sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("question {position} was already answered")]
    AlreadyAnswered { position: usize },
    #[error("exam already submitted")]
    Submitted,
    #[error("question {index} is out of range (total {total})")]
    OutOfRange { index: usize, total: usize },
    #[error("session has not reached its summary yet")]
    NotFinished,
}

/// Errors emitted by the exercise controllers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("nothing available for this selection")]
    NothingAvailable,
    #[error("action not available in the current stage")]
    WrongStage,
    #[error(transparent)]
    Fetch(#[from] QuestionBankError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
