//! Access to the external generative-language service.
//!
//! Everything above this module talks to a [`GenerationClient`] handed in at
//! construction time, so tests can swap the HTTP client for a [`ScriptedClient`].

mod gemini;
mod scripted;
pub mod schema;

use async_trait::async_trait;
use tutor_core::model::{Attachment, ChatRole};

use crate::error::GenerationError;

pub use gemini::{GeminiClient, GeminiConfig};
pub use scripted::ScriptedClient;

#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Run one generation request and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the service is disabled, unreachable, or
    /// replies without text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    InlineData { mime_type: String, data: String },
}

impl Part {
    #[must_use]
    pub fn from_attachment(attachment: &Attachment) -> Self {
        Self::InlineData {
            mime_type: attachment.mime_type().to_string(),
            data: attachment.to_base64(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: ChatRole,
    pub parts: Vec<Part>,
}

impl Turn {
    #[must_use]
    pub fn text(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }
}

/// Expected shape of the reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    Text,
    /// JSON constrained by a service-side response schema.
    Json(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: Option<String>,
    pub turns: Vec<Turn>,
    pub temperature: Option<f32>,
    pub response: ResponseFormat,
}

impl GenerationRequest {
    /// Single user prompt expecting free text.
    #[must_use]
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            turns: vec![Turn::text(ChatRole::User, text)],
            temperature: None,
            response: ResponseFormat::Text,
        }
    }

    #[must_use]
    pub fn conversation(turns: Vec<Turn>) -> Self {
        Self {
            system_instruction: None,
            turns,
            temperature: None,
            response: ResponseFormat::Text,
        }
    }

    #[must_use]
    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn expecting_json(mut self, schema: serde_json::Value) -> Self {
        self.response = ResponseFormat::Json(schema);
        self
    }

    /// Text of the last user turn; handy for logs and test assertions.
    #[must_use]
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .filter(|turn| turn.role == ChatRole::User)
            .flat_map(|turn| turn.parts.iter())
            .find_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
    }
}
