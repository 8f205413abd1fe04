use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::grading::{AnswerMatch, Gradable};

//
// ─── VALIDATION ERRORS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,
    #[error("a question needs at least two options, got {count}")]
    TooFewOptions { count: usize },
    #[error("option {index} is empty")]
    EmptyOption { index: usize },
    #[error("option {option:?} appears more than once")]
    DuplicateOption { option: String },
    #[error("correct answer {answer:?} is not one of the options")]
    AnswerNotAnOption { answer: String },
    #[error("reading passage text is empty")]
    EmptyPassage,
    #[error("reading passage has no questions")]
    NoQuestions,
    #[error("rewrite item has no original sentence")]
    EmptyOriginal,
    #[error("correct answer is empty")]
    EmptyAnswer,
}

//
// ─── EXAM SECTIONS ─────────────────────────────────────────────────────────────
//

/// One of the four parts of the mock entrance exam.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamSection {
    Phonetics,
    GrammarVocabulary,
    Reading,
    Writing,
    Other(String),
}

impl ExamSection {
    /// Sections in exam order.
    pub const ORDERED: [ExamSection; 4] = [
        ExamSection::Phonetics,
        ExamSection::GrammarVocabulary,
        ExamSection::Reading,
        ExamSection::Writing,
    ];

    /// Parses the free-text part label returned by the generation service.
    ///
    /// Returns `None` for blank labels; anything unrecognised is kept verbatim.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        let section = if lower.contains("phon")
            || lower.contains("pronunc")
            || lower.contains("stress")
        {
            Self::Phonetics
        } else if lower.contains("grammar") || lower.contains("vocab") {
            Self::GrammarVocabulary
        } else if lower.contains("read") {
            Self::Reading
        } else if lower.contains("writ") {
            Self::Writing
        } else {
            Self::Other(trimmed.to_string())
        };
        Some(section)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Phonetics => "Phonetics",
            Self::GrammarVocabulary => "Grammar & Vocabulary",
            Self::Reading => "Reading",
            Self::Writing => "Writing",
            Self::Other(label) => label,
        }
    }

    /// Number of questions the section carries in a full exam.
    #[must_use]
    pub fn expected_count(&self) -> Option<usize> {
        match self {
            Self::Phonetics => Some(4),
            Self::GrammarVocabulary => Some(8),
            Self::Reading => Some(20),
            Self::Writing => Some(8),
            Self::Other(_) => None,
        }
    }
}

//
// ─── MULTIPLE-CHOICE QUESTIONS ─────────────────────────────────────────────────
//

/// Unvalidated question, as assembled from a generation response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub topic: Option<String>,
    pub section: Option<String>,
}

impl QuestionDraft {
    /// Validate and normalize the draft into an immutable question.
    ///
    /// Options and the correct answer are trimmed. A bare option letter
    /// (`"B"`, `"B."`, `"B)"`) is accepted as the correct answer when it does
    /// not literally match an option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is blank, there are fewer than two
    /// options, an option is blank or duplicated, or the answer is not an option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        let options: Vec<String> = self
            .options
            .iter()
            .map(|option| option.trim().to_string())
            .collect();
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        for (index, option) in options.iter().enumerate() {
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            if options[..index].contains(option) {
                return Err(QuestionError::DuplicateOption {
                    option: option.clone(),
                });
            }
        }

        let correct_answer = resolve_answer(&options, self.correct_answer.trim())?;

        Ok(Question {
            prompt,
            options,
            correct_answer,
            explanation: self.explanation.trim().to_string(),
            topic: normalize_optional(self.topic),
            section: self.section.as_deref().and_then(ExamSection::parse_label),
        })
    }
}

fn resolve_answer(options: &[String], answer: &str) -> Result<String, QuestionError> {
    if answer.is_empty() {
        return Err(QuestionError::EmptyAnswer);
    }
    if let Some(option) = options.iter().find(|option| option.as_str() == answer) {
        return Ok(option.clone());
    }
    option_letter_index(answer)
        .and_then(|index| options.get(index))
        .cloned()
        .ok_or_else(|| QuestionError::AnswerNotAnOption {
            answer: answer.to_string(),
        })
}

fn option_letter_index(answer: &str) -> Option<usize> {
    let letter = answer
        .strip_suffix('.')
        .or_else(|| answer.strip_suffix(')'))
        .unwrap_or(answer);
    let mut chars = letter.chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_alphabetic() {
        return None;
    }
    Some(usize::from(first.to_ascii_uppercase() as u8 - b'A'))
}

/// A validated multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
    topic: Option<String>,
    section: Option<ExamSection>,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn section(&self) -> Option<&ExamSection> {
        self.section.as_ref()
    }
}

impl Gradable for Question {
    fn expected_answer(&self) -> &str {
        &self.correct_answer
    }

    fn answer_match(&self) -> AnswerMatch {
        AnswerMatch::Exact
    }

    fn explanation(&self) -> &str {
        &self.explanation
    }
}

//
// ─── READING PASSAGES ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingPassage {
    passage: String,
    questions: Vec<Question>,
}

impl ReadingPassage {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPassage` for blank text and
    /// `QuestionError::NoQuestions` when `questions` is empty.
    pub fn new(passage: impl Into<String>, questions: Vec<Question>) -> Result<Self, QuestionError> {
        let passage = passage.into().trim().to_string();
        if passage.is_empty() {
            return Err(QuestionError::EmptyPassage);
        }
        if questions.is_empty() {
            return Err(QuestionError::NoQuestions);
        }
        Ok(Self { passage, questions })
    }

    #[must_use]
    pub fn passage(&self) -> &str {
        &self.passage
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

//
// ─── SENTENCE REWRITING ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritingItemDraft {
    pub original: String,
    pub hint: String,
    pub correct_answer: String,
    pub explanation: String,
}

impl WritingItemDraft {
    /// # Errors
    ///
    /// Returns `QuestionError` when the original sentence or the answer is blank.
    pub fn validate(self) -> Result<WritingItem, QuestionError> {
        let original = self.original.trim().to_string();
        if original.is_empty() {
            return Err(QuestionError::EmptyOriginal);
        }
        let correct_answer = self.correct_answer.trim().to_string();
        if correct_answer.is_empty() {
            return Err(QuestionError::EmptyAnswer);
        }
        Ok(WritingItem {
            original,
            hint: self.hint.trim().to_string(),
            correct_answer,
            explanation: self.explanation.trim().to_string(),
        })
    }
}

/// A free-text sentence transformation exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritingItem {
    original: String,
    hint: String,
    correct_answer: String,
    explanation: String,
}

impl WritingItem {
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }
}

impl Gradable for WritingItem {
    fn expected_answer(&self) -> &str {
        &self.correct_answer
    }

    fn answer_match(&self) -> AnswerMatch {
        AnswerMatch::Relaxed
    }

    fn explanation(&self) -> &str {
        &self.explanation
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(options: &[&str], answer: &str) -> QuestionDraft {
        QuestionDraft {
            prompt: "If I ___ you, I would study harder.".into(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            correct_answer: answer.into(),
            explanation: "Second conditional uses 'were'.".into(),
            topic: Some(" Conditional Sentences ".into()),
            section: None,
        }
    }

    #[test]
    fn validates_and_trims() {
        let question = draft(&[" was", "were ", "am"], " were").validate().unwrap();
        assert_eq!(question.options(), ["was", "were", "am"]);
        assert_eq!(question.correct_answer(), "were");
        assert_eq!(question.topic(), Some("Conditional Sentences"));
    }

    #[test]
    fn accepts_option_letter_as_answer() {
        let question = draft(&["was", "were", "am", "is"], "B.").validate().unwrap();
        assert_eq!(question.correct_answer(), "were");
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = draft(&["was", "were"], "be").validate().unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerNotAnOption {
                answer: "be".into()
            }
        );
    }

    #[test]
    fn rejects_letter_past_last_option() {
        let err = draft(&["was", "were"], "D").validate().unwrap_err();
        assert!(matches!(err, QuestionError::AnswerNotAnOption { .. }));
    }

    #[test]
    fn rejects_single_option_and_duplicates() {
        assert_eq!(
            draft(&["were"], "were").validate().unwrap_err(),
            QuestionError::TooFewOptions { count: 1 }
        );
        assert!(matches!(
            draft(&["were", "were "], "were").validate().unwrap_err(),
            QuestionError::DuplicateOption { .. }
        ));
    }

    #[test]
    fn parses_section_labels() {
        assert_eq!(
            ExamSection::parse_label("Part 1: Pronunciation & Stress"),
            Some(ExamSection::Phonetics)
        );
        assert_eq!(
            ExamSection::parse_label("Grammar and Vocabulary"),
            Some(ExamSection::GrammarVocabulary)
        );
        assert_eq!(ExamSection::parse_label("  "), None);
        assert_eq!(
            ExamSection::parse_label("Listening"),
            Some(ExamSection::Other("Listening".into()))
        );
        let total: usize = ExamSection::ORDERED
            .iter()
            .filter_map(ExamSection::expected_count)
            .sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn passage_requires_text_and_questions() {
        assert_eq!(
            ReadingPassage::new("   ", Vec::new()).unwrap_err(),
            QuestionError::EmptyPassage
        );
        assert_eq!(
            ReadingPassage::new("Text", Vec::new()).unwrap_err(),
            QuestionError::NoQuestions
        );
    }

    #[test]
    fn writing_item_requires_answer() {
        let err = WritingItemDraft {
            original: "He started learning English two years ago.".into(),
            hint: "He has ...".into(),
            correct_answer: "  ".into(),
            explanation: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyAnswer);
    }
}
