use serde::{Deserialize, Serialize};

/// Which drill the grammar/vocabulary view is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticeKind {
    Grammar,
    Vocabulary,
}

impl PracticeKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Grammar => "Grammar",
            Self::Vocabulary => "Vocabulary",
        }
    }
}

/// Exercise label carried into a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    GrammarVocab { kind: PracticeKind, topic: String },
    ReadingWriting,
    FullExam,
}

impl ExerciseKind {
    #[must_use]
    pub fn report_label(&self) -> String {
        match self {
            Self::GrammarVocab { kind, topic } => format!("{} - Topic: {topic}", kind.label()),
            Self::ReadingWriting => "Reading & Writing skills".to_string(),
            Self::FullExam => "Full mock exam (entrance exam structure)".to_string(),
        }
    }
}
