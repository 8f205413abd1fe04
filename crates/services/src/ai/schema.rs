//! Response schemas sent as `generationConfig.responseSchema`.
//!
//! The service honours them loosely, so replies are still validated entry by
//! entry after parsing.

use serde_json::{Value, json};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

fn question_properties() -> serde_json::Map<String, Value> {
    let mut properties = serde_json::Map::new();
    properties.insert("question".into(), string());
    properties.insert("options".into(), string_array());
    properties.insert("correctAnswer".into(), string());
    properties.insert("explanation".into(), string());
    properties
}

/// `["topic", ...]`
#[must_use]
pub fn topics() -> Value {
    string_array()
}

/// Multiple-choice questions for one topic.
#[must_use]
pub fn questions() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": question_properties(),
            "required": ["question", "options", "correctAnswer", "explanation"],
        },
    })
}

/// Full-exam questions, each tagged with its topic and exam part.
#[must_use]
pub fn exam_questions() -> Value {
    let mut properties = question_properties();
    properties.insert("topic".into(), string());
    properties.insert(
        "part".into(),
        json!({
            "type": "STRING",
            "description": "Exam part: Phonetics, Grammar & Vocabulary, Reading, Writing",
        }),
    );
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": ["question", "options", "correctAnswer", "explanation", "topic", "part"],
        },
    })
}

#[must_use]
pub fn reading_passages() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "passage": string(),
                "questions": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": question_properties(),
                        "required": ["question", "options", "correctAnswer", "explanation"],
                    },
                },
            },
            "required": ["passage", "questions"],
        },
    })
}

#[must_use]
pub fn writing_items() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "original": string(),
                "hint": string(),
                "correctAnswer": string(),
                "explanation": string(),
            },
            "required": ["original", "hint", "correctAnswer", "explanation"],
        },
    })
}
