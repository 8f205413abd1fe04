use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttachmentError {
    #[error("attachment has no data")]
    Empty,
    #[error("MIME type {mime_type:?} does not fit a {kind:?} attachment")]
    MimeMismatch {
        kind: AttachmentKind,
        mime_type: String,
    },
    #[error("attachment data is not valid base64")]
    InvalidBase64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Tutor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Image,
    Audio,
}

impl AttachmentKind {
    fn accepts(self, mime_type: &str) -> bool {
        let prefix = match self {
            Self::Image => "image/",
            Self::Audio => "audio/",
        };
        mime_type.starts_with(prefix)
    }
}

/// Binary payload sent alongside a chat turn.
///
/// The optional preview is a locally displayable data URL for images; it is
/// never part of what goes over the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    kind: AttachmentKind,
    mime_type: String,
    bytes: Vec<u8>,
    preview: Option<String>,
}

impl Attachment {
    /// # Errors
    ///
    /// Returns `AttachmentError` when `bytes` is empty or the MIME type is not `image/*`.
    pub fn image(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        let attachment = Self::new(AttachmentKind::Image, mime_type.into(), bytes)?;
        let preview = attachment.data_url();
        Ok(Self {
            preview: Some(preview),
            ..attachment
        })
    }

    /// # Errors
    ///
    /// Returns `AttachmentError` when `bytes` is empty or the MIME type is not `audio/*`.
    pub fn audio(mime_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        Self::new(AttachmentKind::Audio, mime_type.into(), bytes)
    }

    /// Decode an attachment delivered as base64 text (e.g. from the webview).
    ///
    /// # Errors
    ///
    /// Returns `AttachmentError::InvalidBase64` for undecodable data, plus the
    /// errors of [`Attachment::image`] / [`Attachment::audio`].
    pub fn from_base64(
        kind: AttachmentKind,
        mime_type: impl Into<String>,
        data: &str,
    ) -> Result<Self, AttachmentError> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|_| AttachmentError::InvalidBase64)?;
        match kind {
            AttachmentKind::Image => Self::image(mime_type, bytes),
            AttachmentKind::Audio => Self::audio(mime_type, bytes),
        }
    }

    fn new(kind: AttachmentKind, mime_type: String, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        if bytes.is_empty() {
            return Err(AttachmentError::Empty);
        }
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !kind.accepts(&mime_type) {
            return Err(AttachmentError::MimeMismatch { kind, mime_type });
        }
        Ok(Self {
            kind,
            mime_type,
            bytes,
            preview: None,
        })
    }

    #[must_use]
    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Standard-alphabet base64 of the payload, as transmitted.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("kind", &self.kind)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: Uuid,
    role: ChatRole,
    text: String,
    attachments: Vec<Attachment>,
    sent_at: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            text: text.into(),
            attachments,
            sent_at,
        }
    }

    #[must_use]
    pub fn tutor(text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Tutor,
            text: text.into(),
            attachments: Vec::new(),
            sent_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn role(&self) -> ChatRole {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[must_use]
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}

/// Append-only conversation history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_greeting(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            messages: vec![ChatMessage::tutor(text, at)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
