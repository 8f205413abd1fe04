use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tutor_core::model::{AppSettings, ChatRole};

use super::{GenerationClient, GenerationRequest, Part, ResponseFormat, Turn};
use crate::error::GenerationError;

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Builds a config from settings; `None` when no API key is configured.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Option<Self> {
        let api_key = settings.api_key()?.to_string();
        Some(Self {
            base_url: settings.api_base_url().to_string(),
            api_key,
            model: settings.api_model().to_string(),
            timeout: Duration::from_secs(settings.request_timeout_secs()),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// `generateContent` client for the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: Option<GeminiConfig>,
}

impl GeminiClient {
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(GeminiConfig::from_settings(settings))
    }

    #[must_use]
    pub fn new(config: Option<GeminiConfig>) -> Self {
        let client = config
            .as_ref()
            .map_or_else(Client::new, |config| http_client(config.timeout));
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

/// HTTP client with a request timeout; falls back to reqwest's defaults when
/// the TLS backend cannot be initialized.
fn http_client(timeout: Duration) -> Client {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(
                error = %err,
                ?timeout,
                "http client build failed; requests have no timeout"
            );
            Client::new()
        }
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let payload = GenerateContentRequest::from(&request);
        tracing::debug!(model = %config.model, turns = payload.contents.len(), "generateContent");

        let response = self
            .client
            .post(config.endpoint())
            .header("x-goog-api-key", &config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body: GenerateContentResponse = response.json().await?;
        if let Some(reason) = body
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(GenerationError::Blocked(reason));
        }

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    contents: Vec<WireContent>,
    generation_config: WireGenerationConfig,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let (response_mime_type, response_schema) = match &request.response {
            ResponseFormat::Text => (None, None),
            ResponseFormat::Json(schema) => (Some("application/json"), Some(schema.clone())),
        };
        Self {
            system_instruction: request.system_instruction.as_ref().map(|text| WireContent {
                role: None,
                parts: vec![WirePart::text(text)],
            }),
            contents: request.turns.iter().map(WireContent::from).collect(),
            generation_config: WireGenerationConfig {
                temperature: request.temperature,
                response_mime_type,
                response_schema,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart>,
}

impl From<&Turn> for WireContent {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            ChatRole::User => "user",
            ChatRole::Tutor => "model",
        };
        Self {
            role: Some(role),
            parts: turn.parts.iter().map(WirePart::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
}

impl WirePart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => Self::text(text),
            Part::InlineData { mime_type, data } => Self {
                text: None,
                inline_data: Some(WireInlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireResponseContent>,
}

#[derive(Debug, Deserialize)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_conversation_with_inline_data() {
        let request = GenerationRequest::conversation(vec![
            Turn::text(ChatRole::Tutor, "Hello"),
            Turn {
                role: ChatRole::User,
                parts: vec![
                    Part::Text("What does this say?".into()),
                    Part::InlineData {
                        mime_type: "image/png".into(),
                        data: "AQID".into(),
                    },
                ],
            },
        ])
        .with_system("Be kind.")
        .with_temperature(0.5);

        let value = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": { "parts": [{ "text": "Be kind." }] },
                "contents": [
                    { "role": "model", "parts": [{ "text": "Hello" }] },
                    { "role": "user", "parts": [
                        { "text": "What does this say?" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ] }
                ],
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn json_requests_carry_schema() {
        let schema = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        let request = GenerationRequest::prompt("List topics").expecting_json(schema.clone());
        let value = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"], schema);
        assert!(value.get("systemInstruction").is_none());
    }

    #[test]
    fn endpoint_joins_model() {
        let config = GeminiConfig {
            base_url: "https://example.test/v1beta/".into(),
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            config.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn configured_client_is_enabled() {
        let config = GeminiConfig {
            base_url: "https://example.test/v1beta".into(),
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            timeout: Duration::from_millis(1500),
        };
        let client = GeminiClient::new(Some(config));
        assert!(client.enabled());
        let _ = http_client(Duration::from_secs(1));
    }

    #[tokio::test]
    async fn disabled_without_api_key() {
        let client = GeminiClient::from_settings(&AppSettings::default());
        assert!(!client.enabled());
        let err = client
            .generate(GenerationRequest::prompt("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Disabled));
    }
}
