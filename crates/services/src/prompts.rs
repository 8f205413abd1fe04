//! Prompt text sent to the generation service.

use tutor_core::model::{PracticeKind, ReportMetrics};

pub const TOPIC_COUNT: usize = 15;
pub const QUESTIONS_PER_TOPIC: usize = 10;
pub const READING_PASSAGES: usize = 5;
pub const WRITING_ITEMS: usize = 10;
pub const EXAM_QUESTIONS: usize = 40;

/// Sampling temperature for tutor chat replies.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Persona shared by the chat tutor and the report writer.
#[must_use]
pub fn tutor_persona(student: &str) -> String {
    format!(
        "You are a professional English tutor preparing students for the Hanoi grade-10 \
         entrance exam. You are coaching a student named {student}.\n\n\
         Language rules:\n\
         1. Keep passages, questions, options, original sentences, hints and correct \
         answers in their original English. Never translate them.\n\
         2. Write explanations, tips and feedback in Vietnamese.\n\n\
         Be friendly, encouraging and professional. Address the student as '{student}'."
    )
}

#[must_use]
pub fn greeting(student: &str) -> String {
    format!(
        "Hi {student}! I'm your English tutor. Ask me anything about grammar, vocabulary, \
         reading or writing. You can also send a photo of an exercise or a voice question."
    )
}

/// Text sent with a voice-only chat turn.
pub const VOICE_TURN_TEXT: &str = "The student is sending a voice recording question.";

/// Stand-in history text for an earlier turn that carried only attachments.
pub const ATTACHMENT_TURN_TEXT: &str = "The student sent a picture of an exercise.";

#[must_use]
pub fn topics(kind: PracticeKind) -> String {
    format!(
        "List {TOPIC_COUNT} {} topics that frequently appear in the Hanoi grade-10 English \
         entrance exam. Return a JSON array of topic names.",
        kind.label().to_lowercase()
    )
}

#[must_use]
pub fn topic_questions(kind: PracticeKind, topic: &str) -> String {
    format!(
        "Create {QUESTIONS_PER_TOPIC} multiple-choice {} questions on the topic \"{topic}\". \
         Question, options and correctAnswer: English; correctAnswer must repeat one option \
         verbatim. Explanation: Vietnamese.",
        kind.label().to_lowercase()
    )
}

#[must_use]
pub fn full_exam() -> String {
    format!(
        "Compose a full mock Hanoi grade-10 English entrance exam of {EXAM_QUESTIONS} \
         multiple-choice questions in four parts, in this order:\n\
         1. Phonetics: 4 questions (2 pronunciation, 2 word stress).\n\
         2. Grammar & Vocabulary: 8 questions (grade 9-10 topics).\n\
         3. Reading: 20 questions (notices and signs, cloze passages, comprehension).\n\
         4. Writing: 8 questions (sentence transformation, sentence ordering, topic sentences).\n\n\
         Rules:\n\
         - Question, options and correctAnswer stay in English; correctAnswer repeats one option verbatim.\n\
         - Explanation and topic are written in Vietnamese.\n\
         - Set part to one of: Phonetics, Grammar & Vocabulary, Reading, Writing.\n\
         - Do not repeat questions."
    )
}

#[must_use]
pub fn reading_passages() -> String {
    format!(
        "Choose {READING_PASSAGES} English reading-comprehension passages, each with \
         multiple-choice questions. Passage, questions and options: English. \
         Explanation: Vietnamese."
    )
}

#[must_use]
pub fn writing_items() -> String {
    format!(
        "Choose {WRITING_ITEMS} English sentence-rewriting exercises. Original sentence, \
         hint (the required opening words) and correctAnswer: English. Explanation: Vietnamese."
    )
}

#[must_use]
pub fn report(metrics: &ReportMetrics, student: &str, recipient: Option<&str>) -> String {
    let addressee = match recipient {
        Some(address) => format!("{student}'s mother ({address})"),
        None => format!("{student}'s mother"),
    };
    let topics = if metrics.topics.is_empty() {
        "General knowledge".to_string()
    } else {
        metrics.topics.join(", ")
    };
    format!(
        "Write a short, professional progress report letter to {addressee}.\n\
         Details:\n\
         - Exercise: {}\n\
         - Score: {}\n\
         - Correct answers: {}/{}\n\
         - Areas covered: {topics}\n\n\
         Keep the tone polite and encouraging towards {student}, point out strengths and \
         how to improve. Sign the letter as \"{student}'s AI tutor\".",
        metrics.exercise, metrics.score, metrics.correct, metrics.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_prompt_carries_metrics() {
        let metrics = ReportMetrics::new("Full mock exam", 27, 40, vec!["Tenses".into()]);
        let prompt = report(&metrics, "Khang", Some("parent@example.com"));
        assert!(prompt.contains("Score: 6.8"));
        assert!(prompt.contains("27/40"));
        assert!(prompt.contains("Khang's mother (parent@example.com)"));
        assert!(prompt.contains("Areas covered: Tenses"));
    }

    #[test]
    fn report_prompt_defaults_topics() {
        let metrics = ReportMetrics::new("Reading & Writing skills", 0, 0, Vec::new());
        assert!(report(&metrics, "Khang", None).contains("General knowledge"));
    }
}
