use dioxus::prelude::*;
use services::{FlowError, GenerationError, QuestionBankError, ReportError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// The service answered but had nothing usable.
    NothingAvailable,
    /// No API key configured.
    Unavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Something went wrong. Please try again.",
            Self::NothingAvailable => "No exercises came back this time. Please try again.",
            Self::Unavailable => "The tutor service is unavailable: no API key is configured.",
        }
    }
}

fn from_generation(err: &GenerationError) -> ViewError {
    match err {
        GenerationError::Disabled => ViewError::Unavailable,
        _ => ViewError::Unknown,
    }
}

impl From<&FlowError> for ViewError {
    fn from(err: &FlowError) -> Self {
        match err {
            FlowError::NothingAvailable => Self::NothingAvailable,
            FlowError::Fetch(QuestionBankError::Generation(inner)) => from_generation(inner),
            _ => Self::Unknown,
        }
    }
}

impl From<&ReportError> for ViewError {
    fn from(err: &ReportError) -> Self {
        match err {
            ReportError::Empty => Self::NothingAvailable,
            ReportError::Generation(inner) => from_generation(inner),
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
