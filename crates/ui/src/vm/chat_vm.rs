use tutor_core::model::{AttachmentKind, ChatLog, ChatMessage, ChatRole};

use super::markdown_vm::{markdown_to_html, plain_text_to_html};
use super::time_fmt::format_clock_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageVm {
    pub id: String,
    pub from_tutor: bool,
    pub html: String,
    pub time: String,
    pub images: Vec<String>,
    pub has_audio: bool,
}

impl ChatMessageVm {
    #[must_use]
    pub fn bubble_class(&self) -> &'static str {
        if self.from_tutor {
            "bubble bubble-tutor"
        } else {
            "bubble bubble-user"
        }
    }
}

#[must_use]
pub fn map_chat_message(message: &ChatMessage) -> ChatMessageVm {
    let from_tutor = message.role() == ChatRole::Tutor;
    let html = if from_tutor {
        markdown_to_html(message.text())
    } else {
        plain_text_to_html(message.text())
    };
    let images = message
        .attachments()
        .iter()
        .filter(|attachment| attachment.kind() == AttachmentKind::Image)
        .map(|attachment| {
            attachment
                .preview()
                .map_or_else(|| attachment.data_url(), str::to_string)
        })
        .collect();
    let has_audio = message
        .attachments()
        .iter()
        .any(|attachment| attachment.kind() == AttachmentKind::Audio);

    ChatMessageVm {
        id: message.id().to_string(),
        from_tutor,
        html,
        time: format_clock_time(message.sent_at()),
        images,
        has_audio,
    }
}

#[must_use]
pub fn map_chat_log(log: &ChatLog) -> Vec<ChatMessageVm> {
    log.messages().iter().map(map_chat_message).collect()
}
