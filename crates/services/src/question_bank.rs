use std::sync::Arc;

use serde_json::Value;
use tutor_core::model::{
    PracticeKind, Question, QuestionDraft, QuestionError, ReadingPassage, WritingItem,
    WritingItemDraft,
};

use crate::ai::{GenerationClient, GenerationRequest, schema};
use crate::error::QuestionBankError;
use crate::prompts;

/// Fetches exercise content from the generation service.
///
/// Every call is one request; nothing is cached or retried. Entries that fail
/// validation are dropped, so an `Ok` result may be shorter than requested or
/// empty.
#[derive(Clone)]
pub struct QuestionBank {
    client: Arc<dyn GenerationClient>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Topic names for a grammar or vocabulary drill.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the request fails or the reply is not a JSON array.
    pub async fn topics(&self, kind: PracticeKind) -> Result<Vec<String>, QuestionBankError> {
        let entries = self
            .fetch_array("topics", prompts::topics(kind), schema::topics())
            .await?;
        let mut topics: Vec<String> = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.as_str().map(str::trim) {
                Some(topic) if !topic.is_empty() => {
                    if !topics.iter().any(|seen| seen == topic) {
                        topics.push(topic.to_string());
                    }
                }
                _ => tracing::warn!(?entry, "dropping invalid topic entry"),
            }
        }
        Ok(topics)
    }

    /// A fresh batch of multiple-choice questions for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the request fails or the reply is not a JSON array.
    pub async fn topic_questions(
        &self,
        kind: PracticeKind,
        topic: &str,
    ) -> Result<Vec<Question>, QuestionBankError> {
        let entries = self
            .fetch_array(
                "questions",
                prompts::topic_questions(kind, topic),
                schema::questions(),
            )
            .await?;
        Ok(collect_valid("question", entries, |entry| {
            parse_question(entry, Some(topic))
        }))
    }

    /// Questions for a full mock exam, in exam order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the request fails or the reply is not a JSON array.
    pub async fn full_exam(&self) -> Result<Vec<Question>, QuestionBankError> {
        let entries = self
            .fetch_array("exam", prompts::full_exam(), schema::exam_questions())
            .await?;
        let questions = collect_valid("exam question", entries, |entry| parse_question(entry, None));
        if questions.len() != prompts::EXAM_QUESTIONS {
            tracing::info!(
                count = questions.len(),
                expected = prompts::EXAM_QUESTIONS,
                "exam arrived with an unexpected question count"
            );
        }
        Ok(questions)
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError` if the request fails or the reply is not a JSON array.
    pub async fn reading_passages(&self) -> Result<Vec<ReadingPassage>, QuestionBankError> {
        let entries = self
            .fetch_array(
                "reading",
                prompts::reading_passages(),
                schema::reading_passages(),
            )
            .await?;
        Ok(collect_valid("reading passage", entries, parse_passage))
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError` if the request fails or the reply is not a JSON array.
    pub async fn writing_items(&self) -> Result<Vec<WritingItem>, QuestionBankError> {
        let entries = self
            .fetch_array("writing", prompts::writing_items(), schema::writing_items())
            .await?;
        Ok(collect_valid("writing item", entries, parse_writing_item))
    }

    async fn fetch_array(
        &self,
        what: &'static str,
        prompt: String,
        schema: Value,
    ) -> Result<Vec<Value>, QuestionBankError> {
        tracing::debug!(what, %prompt, "requesting content");
        let request = GenerationRequest::prompt(prompt).expecting_json(schema);
        let reply = self.client.generate(request).await.map_err(|err| {
            tracing::error!(what, error = %err, "content request failed");
            err
        })?;
        let entries = parse_array(what, &reply)?;
        tracing::info!(what, count = entries.len(), "content received");
        Ok(entries)
    }
}

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

#[derive(Debug)]
enum EntryError {
    NotAnObject,
    MissingField(&'static str),
    Invalid(QuestionError),
}

impl From<QuestionError> for EntryError {
    fn from(err: QuestionError) -> Self {
        Self::Invalid(err)
    }
}

fn parse_array(what: &'static str, reply: &str) -> Result<Vec<Value>, QuestionBankError> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body).map_err(|err| QuestionBankError::Malformed {
        what,
        reason: err.to_string(),
    })?;
    match value {
        Value::Array(entries) => Ok(entries),
        other => Err(QuestionBankError::Malformed {
            what,
            reason: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

// Replies occasionally arrive wrapped in a ```json fence despite the MIME type.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    // Language tag, if any: "json" in "```json".
    body.trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn collect_valid<T>(
    what: &'static str,
    entries: Vec<Value>,
    parse: impl Fn(&Value) -> Result<T, EntryError>,
) -> Vec<T> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(what, index, ?err, "dropping invalid entry");
                None
            }
        })
        .collect()
}

fn text_field(entry: &Value, field: &'static str) -> Result<String, EntryError> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(EntryError::MissingField(field))
}

fn optional_text(entry: &Value, field: &str) -> Option<String> {
    entry.get(field).and_then(Value::as_str).map(str::to_string)
}

fn parse_question(entry: &Value, topic: Option<&str>) -> Result<Question, EntryError> {
    if !entry.is_object() {
        return Err(EntryError::NotAnObject);
    }
    let options = entry
        .get("options")
        .and_then(Value::as_array)
        .ok_or(EntryError::MissingField("options"))?
        .iter()
        .map(|option| option.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or(EntryError::MissingField("options"))?;

    let draft = QuestionDraft {
        prompt: text_field(entry, "question")?,
        options,
        correct_answer: text_field(entry, "correctAnswer")?,
        explanation: optional_text(entry, "explanation").unwrap_or_default(),
        topic: optional_text(entry, "topic").or_else(|| topic.map(str::to_string)),
        section: optional_text(entry, "part"),
    };
    Ok(draft.validate()?)
}

fn parse_passage(entry: &Value) -> Result<ReadingPassage, EntryError> {
    if !entry.is_object() {
        return Err(EntryError::NotAnObject);
    }
    let passage = text_field(entry, "passage")?;
    let questions = entry
        .get("questions")
        .and_then(Value::as_array)
        .ok_or(EntryError::MissingField("questions"))?;
    let questions = collect_valid("passage question", questions.clone(), |question| {
        parse_question(question, None)
    });
    Ok(ReadingPassage::new(passage, questions)?)
}

fn parse_writing_item(entry: &Value) -> Result<WritingItem, EntryError> {
    if !entry.is_object() {
        return Err(EntryError::NotAnObject);
    }
    let draft = WritingItemDraft {
        original: text_field(entry, "original")?,
        hint: optional_text(entry, "hint").unwrap_or_default(),
        correct_answer: text_field(entry, "correctAnswer")?,
        explanation: optional_text(entry, "explanation").unwrap_or_default(),
    };
    Ok(draft.validate()?)
}
