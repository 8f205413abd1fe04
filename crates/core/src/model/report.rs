use crate::model::score::Score;

/// Figures a report is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetrics {
    pub exercise: String,
    pub score: Score,
    pub correct: usize,
    pub total: usize,
    pub topics: Vec<String>,
}

impl ReportMetrics {
    #[must_use]
    pub fn new(exercise: impl Into<String>, correct: usize, total: usize, topics: Vec<String>) -> Self {
        Self {
            exercise: exercise.into(),
            score: Score::from_counts(correct, total),
            correct,
            total,
            topics,
        }
    }
}

/// Generated narrative plus the metrics it describes. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    body: String,
    metrics: ReportMetrics,
}

impl ReportDraft {
    #[must_use]
    pub fn new(body: impl Into<String>, metrics: ReportMetrics) -> Self {
        Self {
            body: body.into(),
            metrics,
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn metrics(&self) -> &ReportMetrics {
        &self.metrics
    }
}
