use std::sync::Arc;

use tutor_core::Clock;
use tutor_core::model::{Attachment, ChatLog, ChatMessage, ChatRole};

use crate::ai::{GenerationClient, GenerationRequest, Part, Turn};
use crate::error::ChatError;
use crate::prompts;

/// Everything needed to ask the tutor for one reply.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    /// Prior conversation, text only.
    pub history: Vec<Turn>,
    /// The new user turn: its text plus inline attachment data.
    pub turn: Turn,
}

impl TutorRequest {
    #[must_use]
    pub fn into_turns(self) -> Vec<Turn> {
        let mut turns = self.history;
        turns.push(self.turn);
        turns
    }
}

/// Text a logged message contributes to the request history. Attachment-only
/// turns keep their slot so user and model turns still alternate.
fn history_text(message: &ChatMessage) -> Option<&str> {
    if !message.text().trim().is_empty() {
        Some(message.text())
    } else if !message.attachments().is_empty() {
        Some(prompts::ATTACHMENT_TURN_TEXT)
    } else {
        None
    }
}

/// Conversation state of the tutor chat.
///
/// At most one turn is in flight: `begin_turn` marks the session pending until
/// `complete_turn` or `fail_turn` is called.
#[derive(Debug, Clone)]
pub struct ChatSession {
    clock: Clock,
    log: ChatLog,
    pending: bool,
    last_error: Option<String>,
}

impl ChatSession {
    #[must_use]
    pub fn new(student: &str, clock: Clock) -> Self {
        Self {
            log: ChatLog::with_greeting(prompts::greeting(student), clock.now()),
            clock,
            pending: false,
            last_error: None,
        }
    }

    #[must_use]
    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Message of the most recent failed turn, cleared by the next turn.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a user turn and build the request for it.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Busy` while a reply is pending and
    /// `ChatError::EmptyTurn` for blank text without attachments.
    pub fn begin_turn(
        &mut self,
        text: &str,
        attachments: Vec<Attachment>,
    ) -> Result<TutorRequest, ChatError> {
        if self.pending {
            return Err(ChatError::Busy);
        }
        let text = text.trim();
        if text.is_empty() && attachments.is_empty() {
            return Err(ChatError::EmptyTurn);
        }

        let history = self
            .log
            .messages()
            .iter()
            .filter_map(|message| {
                history_text(message).map(|text| Turn::text(message.role(), text))
            })
            .collect();

        let mut parts = Vec::with_capacity(attachments.len() + 1);
        if !text.is_empty() {
            parts.push(Part::Text(text.to_string()));
        }
        parts.extend(attachments.iter().map(Part::from_attachment));

        self.log
            .push(ChatMessage::user(text, attachments, self.clock.now()));
        self.pending = true;
        self.last_error = None;

        Ok(TutorRequest {
            history,
            turn: Turn {
                role: ChatRole::User,
                parts,
            },
        })
    }

    /// Record a spoken question; the recording goes out with a fixed caption.
    ///
    /// # Errors
    ///
    /// Same as [`ChatSession::begin_turn`].
    pub fn begin_voice_turn(&mut self, audio: Attachment) -> Result<TutorRequest, ChatError> {
        self.begin_turn(prompts::VOICE_TURN_TEXT, vec![audio])
    }

    /// Append the tutor's reply to the pending turn.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NoPendingTurn` when no turn was started.
    pub fn complete_turn(&mut self, reply: impl Into<String>) -> Result<(), ChatError> {
        if !self.pending {
            return Err(ChatError::NoPendingTurn);
        }
        self.log.push(ChatMessage::tutor(reply, self.clock.now()));
        self.pending = false;
        Ok(())
    }

    /// Give up on the pending turn, keeping the user's message in the log.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NoPendingTurn` when no turn was started.
    pub fn fail_turn(&mut self, error: &ChatError) -> Result<(), ChatError> {
        if !self.pending {
            return Err(ChatError::NoPendingTurn);
        }
        self.pending = false;
        self.last_error = Some(error.to_string());
        Ok(())
    }
}

/// Sends chat turns to the generation service with the tutor persona.
#[derive(Clone)]
pub struct ChatService {
    client: Arc<dyn GenerationClient>,
    student: String,
}

impl ChatService {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, student: impl Into<String>) -> Self {
        Self {
            client,
            student: student.into(),
        }
    }

    #[must_use]
    pub fn student(&self) -> &str {
        &self.student
    }

    /// A fresh session greeting the configured student.
    #[must_use]
    pub fn start_session(&self, clock: Clock) -> ChatSession {
        ChatSession::new(&self.student, clock)
    }

    /// # Errors
    ///
    /// Returns `ChatError::Generation` when the request fails or the reply is empty.
    pub async fn reply(&self, request: TutorRequest) -> Result<String, ChatError> {
        let attachments = request
            .turn
            .parts
            .iter()
            .filter(|part| matches!(part, Part::InlineData { .. }))
            .count();
        tracing::debug!(history = request.history.len(), attachments, "tutor turn");

        let generation = GenerationRequest::conversation(request.into_turns())
            .with_system(prompts::tutor_persona(&self.student))
            .with_temperature(prompts::CHAT_TEMPERATURE);
        self.client.generate(generation).await.map_err(|err| {
            tracing::error!(error = %err, "tutor reply failed");
            ChatError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::time::fixed_clock;

    fn session() -> ChatSession {
        ChatSession::new("Khang", fixed_clock())
    }

    #[test]
    fn starts_with_greeting() {
        let session = session();
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().messages()[0].role(), ChatRole::Tutor);
        assert!(session.log().messages()[0].text().contains("Khang"));
    }

    #[test]
    fn blank_turn_is_rejected() {
        let mut session = session();
        let err = session.begin_turn("   ", Vec::new()).unwrap_err();
        assert!(matches!(err, ChatError::EmptyTurn));
        assert_eq!(session.log().len(), 1);
        assert!(!session.is_pending());
    }

    #[test]
    fn second_turn_while_pending_is_busy() {
        let mut session = session();
        session.begin_turn("What is a relative clause?", Vec::new()).unwrap();
        let err = session.begin_turn("Hello?", Vec::new()).unwrap_err();
        assert!(matches!(err, ChatError::Busy));
        assert_eq!(session.log().len(), 2);
    }

    #[test]
    fn request_carries_history_and_inline_image() {
        let mut session = session();
        let image = Attachment::image("image/png", vec![1, 2, 3]).unwrap();
        let request = session.begin_turn("", vec![image]).unwrap();

        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].role, ChatRole::Tutor);
        assert_eq!(
            request.turn.parts,
            [Part::InlineData {
                mime_type: "image/png".into(),
                data: "AQID".into(),
            }]
        );
        assert_eq!(session.log().last().unwrap().attachments().len(), 1);
    }

    #[test]
    fn image_only_turn_keeps_its_place_in_history() {
        let mut session = session();
        let image = Attachment::image("image/png", vec![1, 2, 3]).unwrap();
        session.begin_turn("", vec![image]).unwrap();
        session.complete_turn("That is exercise 3.").unwrap();

        let request = session.begin_turn("And question 4?", Vec::new()).unwrap();
        let roles: Vec<_> = request.history.iter().map(|turn| turn.role).collect();
        assert_eq!(roles, [ChatRole::Tutor, ChatRole::User, ChatRole::Tutor]);
        assert_eq!(
            request.history[1].parts,
            [Part::Text(prompts::ATTACHMENT_TURN_TEXT.into())]
        );
    }

    #[test]
    fn failed_turn_keeps_message_and_records_error() {
        let mut session = session();
        session.begin_turn("Help", Vec::new()).unwrap();
        session
            .fail_turn(&ChatError::Generation(crate::error::GenerationError::Disabled))
            .unwrap();
        assert!(!session.is_pending());
        assert!(session.last_error().is_some());
        assert_eq!(session.log().len(), 2);

        session.begin_turn("Again", Vec::new()).unwrap();
        assert!(session.last_error().is_none());
        session.complete_turn("Sure!").unwrap();
        assert_eq!(session.log().last().unwrap().text(), "Sure!");
        assert!(matches!(
            session.complete_turn("late"),
            Err(ChatError::NoPendingTurn)
        ));
    }
}
