use std::sync::Arc;

use chrono::{DateTime, Utc};
use tutor_core::Clock;
use tutor_core::model::{ReportDraft, ReportMetrics};

use crate::ai::{GenerationClient, GenerationRequest};
use crate::error::{GenerationError, ReportError};
use crate::prompts;

/// Turns session metrics into a narrative progress letter.
#[derive(Clone)]
pub struct ReportComposer {
    client: Arc<dyn GenerationClient>,
    student: String,
    recipient: Option<String>,
}

impl ReportComposer {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, student: impl Into<String>) -> Self {
        Self {
            client,
            student: student.into(),
            recipient: None,
        }
    }

    #[must_use]
    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient;
        self
    }

    /// Generate a report for a finished session.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Empty` when the reply carries no text and
    /// `ReportError::Generation` when the request fails.
    pub async fn compose(&self, metrics: ReportMetrics) -> Result<ReportDraft, ReportError> {
        let prompt = prompts::report(&metrics, &self.student, self.recipient.as_deref());
        let request =
            GenerationRequest::prompt(prompt).with_system(prompts::tutor_persona(&self.student));

        let body = match self.client.generate(request).await {
            Ok(body) => body,
            Err(GenerationError::EmptyResponse) => return Err(ReportError::Empty),
            Err(err) => {
                tracing::error!(error = %err, exercise = %metrics.exercise, "report generation failed");
                return Err(err.into());
            }
        };
        let body = body.trim();
        if body.is_empty() {
            return Err(ReportError::Empty);
        }
        tracing::info!(exercise = %metrics.exercise, score = %metrics.score, "report drafted");
        Ok(ReportDraft::new(body, metrics))
    }
}

/// Confirmation of a simulated send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReport {
    pub recipient: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Simulated delivery: records the send in the log and nothing leaves the machine.
#[derive(Debug, Clone)]
pub struct ReportOutbox {
    clock: Clock,
    recipient: Option<String>,
}

impl ReportOutbox {
    #[must_use]
    pub fn new(clock: Clock, recipient: Option<String>) -> Self {
        Self { clock, recipient }
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    #[must_use]
    pub fn send(&self, draft: &ReportDraft) -> SentReport {
        let sent_at = self.clock.now();
        tracing::info!(
            recipient = self.recipient.as_deref().unwrap_or("<unset>"),
            exercise = %draft.metrics().exercise,
            chars = draft.body().len(),
            "report sent (simulated)"
        );
        SentReport {
            recipient: self.recipient.clone(),
            sent_at,
        }
    }
}
