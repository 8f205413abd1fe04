use services::sessions::{ExamResult, ExamSession, QuestionStatus};
use tutor_core::time::format_duration;

use super::practice_vm::{OptionVm, map_options};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamQuestionVm {
    pub number: usize,
    pub total: usize,
    pub section: Option<String>,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub explanation: Option<String>,
    pub answered: usize,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavCellVm {
    pub index: usize,
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamResultVm {
    pub score: String,
    pub percent: u32,
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
    pub duration: String,
    pub topics: Vec<String>,
}

#[must_use]
pub fn map_exam_question(session: &ExamSession) -> ExamQuestionVm {
    let index = session.current_index();
    let question = session.current();
    let submitted = session.is_submitted();
    ExamQuestionVm {
        number: index + 1,
        total: session.total(),
        section: session.current_section().map(|section| section.label().to_string()),
        prompt: question.prompt().to_string(),
        options: map_options(question, session.answer_at(index), submitted),
        explanation: submitted.then(|| question.explanation().to_string()),
        answered: session.answered_count(),
        can_go_back: index > 0,
        can_go_forward: index + 1 < session.total(),
    }
}

#[must_use]
pub fn map_navigator(session: &ExamSession) -> Vec<NavCellVm> {
    let current = session.current_index();
    (0..session.total())
        .map(|index| {
            let class = match (index == current, session.question_status(index)) {
                (true, _) => "nav-cell nav-current",
                (false, QuestionStatus::Unanswered) => "nav-cell",
                (false, QuestionStatus::Answered) => "nav-cell nav-answered",
                (false, QuestionStatus::Correct) => "nav-cell nav-correct",
                (false, QuestionStatus::Incorrect) => "nav-cell nav-incorrect",
            };
            NavCellVm {
                index,
                label: (index + 1).to_string(),
                class,
            }
        })
        .collect()
}

#[must_use]
pub fn map_exam_result(result: &ExamResult) -> ExamResultVm {
    ExamResultVm {
        score: result.score.to_string(),
        percent: result.score.percent(),
        correct: result.correct,
        wrong: result.wrong,
        unanswered: result.unanswered,
        total: result.total,
        duration: format_duration(result.duration),
        topics: result.topics.clone(),
    }
}
