use std::sync::Arc;

use tutor_core::model::AppSettings;

use crate::Clock;
use crate::ai::{GeminiClient, GenerationClient};
use crate::chat::ChatService;
use crate::question_bank::QuestionBank;
use crate::report::{ReportComposer, ReportOutbox};

/// Assembles app-facing services around one generation client.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    settings: AppSettings,
    generation_enabled: bool,
    question_bank: Arc<QuestionBank>,
    chat: Arc<ChatService>,
    reports: Arc<ReportComposer>,
    outbox: Arc<ReportOutbox>,
}

impl AppServices {
    /// Build services backed by the Gemini REST API.
    ///
    /// Without an API key every request fails with `GenerationError::Disabled`.
    #[must_use]
    pub fn from_settings(settings: AppSettings, clock: Clock) -> Self {
        let client = GeminiClient::from_settings(&settings);
        let enabled = client.enabled();
        if !enabled {
            tracing::warn!("no API key configured; generated content is unavailable");
        }
        Self::assemble(Arc::new(client), enabled, settings, clock)
    }

    /// Build services over an arbitrary client, e.g. a `ScriptedClient` in tests.
    #[must_use]
    pub fn with_client(
        client: Arc<dyn GenerationClient>,
        settings: AppSettings,
        clock: Clock,
    ) -> Self {
        Self::assemble(client, true, settings, clock)
    }

    fn assemble(
        client: Arc<dyn GenerationClient>,
        generation_enabled: bool,
        settings: AppSettings,
        clock: Clock,
    ) -> Self {
        let student = settings.student_name().to_string();
        let recipient = settings.report_recipient().map(str::to_string);

        let question_bank = Arc::new(QuestionBank::new(Arc::clone(&client)));
        let chat = Arc::new(ChatService::new(Arc::clone(&client), student.clone()));
        let reports = Arc::new(
            ReportComposer::new(Arc::clone(&client), student).with_recipient(recipient.clone()),
        );
        let outbox = Arc::new(ReportOutbox::new(clock, recipient));

        Self {
            clock,
            settings,
            generation_enabled,
            question_bank,
            chat,
            reports,
            outbox,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        self.settings.student_name()
    }

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
}
