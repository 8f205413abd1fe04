use std::sync::Arc;

use services::{
    AppServices, ChatService, Clock, Microphone, QuestionBank, ReportComposer, ReportOutbox,
};

/// Everything the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn services(&self) -> &AppServices;
    fn microphone(&self) -> Arc<dyn Microphone + Send + Sync>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    student_name: String,
    report_recipient: Option<String>,
    generation_enabled: bool,

    question_bank: Arc<QuestionBank>,
    chat: Arc<ChatService>,
    reports: Arc<ReportComposer>,
    outbox: Arc<ReportOutbox>,
    microphone: Arc<dyn Microphone + Send + Sync>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let services = app.services();
        Self {
            clock: services.clock(),
            student_name: services.student_name().to_string(),
            report_recipient: services.settings().report_recipient().map(str::to_string),
            generation_enabled: services.generation_enabled(),
            question_bank: services.question_bank(),
            chat: services.chat(),
            reports: services.reports(),
            outbox: services.outbox(),
            microphone: app.microphone(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn report_recipient(&self) -> Option<&str> {
        self.report_recipient.as_deref()
    }

    /// False when no API key is configured; every fetch then fails.
    #[must_use]
    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    #[must_use]
    pub fn question_bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.question_bank)
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn reports(&self) -> Arc<ReportComposer> {
        Arc::clone(&self.reports)
    }

    #[must_use]
    pub fn outbox(&self) -> Arc<ReportOutbox> {
        Arc::clone(&self.outbox)
    }

    #[must_use]
    pub fn microphone(&self) -> Arc<dyn Microphone + Send + Sync> {
        Arc::clone(&self.microphone)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
