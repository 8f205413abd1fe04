use services::sessions::{PracticeSession, PracticeStage, ReadingSession, SessionProgress};
use tutor_core::model::{Gradable, Question, WritingItem};

/// How an answer option is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Wrong,
    Dimmed,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Idle => "option",
            Self::Selected => "option option-selected",
            Self::Correct => "option option-correct",
            Self::Wrong => "option option-wrong",
            Self::Dimmed => "option option-dimmed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub position_label: String,
    pub progress_percent: u32,
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

impl FeedbackVm {
    #[must_use]
    pub fn headline(&self) -> &'static str {
        if self.is_correct {
            "Correct!"
        } else {
            "Not quite."
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub correct: usize,
    pub total: usize,
    pub score: String,
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WritingPromptVm {
    pub original: String,
    pub hint: String,
    pub position_label: String,
    pub progress_percent: u32,
    pub submitted: Option<String>,
}

/// Draws each option against the submitted answer, if any.
///
/// Before grading the options are idle; afterwards the expected option is
/// highlighted and a wrong pick is marked.
#[must_use]
pub fn map_options(question: &Question, submitted: Option<&str>, reveal: bool) -> Vec<OptionVm> {
    question
        .options()
        .iter()
        .map(|option| {
            let chosen = submitted == Some(option.as_str());
            let state = if !reveal {
                if chosen {
                    OptionState::Selected
                } else {
                    OptionState::Idle
                }
            } else if option == question.correct_answer() {
                OptionState::Correct
            } else if chosen {
                OptionState::Wrong
            } else {
                OptionState::Dimmed
            };
            OptionVm {
                text: option.clone(),
                state,
            }
        })
        .collect()
}

fn position_label(progress: SessionProgress) -> String {
    format!("Question {}/{}", progress.position + 1, progress.total)
}

fn current_answer<I: Gradable>(session: &PracticeSession<I>) -> Option<&str> {
    session.answer_at(session.position())
}

#[must_use]
pub fn map_question(session: &PracticeSession<Question>) -> QuestionVm {
    let progress = session.progress();
    let submitted = current_answer(session);
    QuestionVm {
        prompt: session.current().prompt().to_string(),
        options: map_options(session.current(), submitted, submitted.is_some()),
        position_label: position_label(progress),
        progress_percent: progress.percent(),
        locked: session.stage() != PracticeStage::InProgress,
    }
}

#[must_use]
pub fn map_reading_question(session: &ReadingSession) -> QuestionVm {
    let progress = session.progress();
    let submitted = session.answer_at(session.position());
    let question = session.current_question();
    QuestionVm {
        prompt: question.prompt().to_string(),
        options: map_options(question, submitted, submitted.is_some()),
        position_label: position_label(progress),
        progress_percent: progress.percent(),
        locked: session.stage() != PracticeStage::InProgress,
    }
}

#[must_use]
pub fn map_writing_prompt(session: &PracticeSession<WritingItem>) -> WritingPromptVm {
    let progress = session.progress();
    let item = session.current();
    WritingPromptVm {
        original: item.original().to_string(),
        hint: item.hint().to_string(),
        position_label: format!("Sentence {}/{}", progress.position + 1, progress.total),
        progress_percent: progress.percent(),
        submitted: current_answer(session).map(str::to_string),
    }
}

/// Feedback for the item on screen, once it has been graded.
#[must_use]
pub fn map_feedback<I: Gradable>(session: &PracticeSession<I>) -> Option<FeedbackVm> {
    if session.stage() != PracticeStage::FeedbackShown {
        return None;
    }
    let item = session.current();
    let answer = current_answer(session)?;
    Some(FeedbackVm {
        is_correct: item.is_correct(answer),
        correct_answer: item.expected_answer().to_string(),
        explanation: item.explanation().to_string(),
    })
}

#[must_use]
pub fn map_reading_feedback(session: &ReadingSession) -> Option<FeedbackVm> {
    if session.stage() != PracticeStage::FeedbackShown {
        return None;
    }
    let question = session.current_question();
    let answer = session.answer_at(session.position())?;
    Some(FeedbackVm {
        is_correct: question.is_correct(answer),
        correct_answer: question.correct_answer().to_string(),
        explanation: question.explanation().to_string(),
    })
}

#[must_use]
pub fn map_summary<I: Gradable>(session: &PracticeSession<I>) -> SummaryVm {
    let score = session.score();
    SummaryVm {
        correct: session.correct_count(),
        total: session.total(),
        score: score.to_string(),
        percent: score.percent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{QuestionDraft, WritingItemDraft};

    fn question(n: usize) -> Question {
        QuestionDraft {
            prompt: format!("If I ___ rich ({n})"),
            options: vec!["am".into(), "were".into(), "be".into()],
            correct_answer: "were".into(),
            explanation: "Type 2 conditional.".into(),
            topic: None,
            section: None,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn options_are_idle_until_graded() {
        let session = PracticeSession::new(vec![question(1), question(2)]).unwrap();
        let vm = map_question(&session);
        assert_eq!(vm.position_label, "Question 1/2");
        assert_eq!(vm.progress_percent, 50);
        assert!(!vm.locked);
        assert!(vm.options.iter().all(|option| option.state == OptionState::Idle));
        assert!(map_feedback(&session).is_none());
    }

    #[test]
    fn wrong_pick_highlights_expected_option() {
        let mut session = PracticeSession::new(vec![question(1)]).unwrap();
        session.submit_answer("am").unwrap();

        let vm = map_question(&session);
        let states: Vec<_> = vm.options.iter().map(|option| option.state).collect();
        assert_eq!(
            states,
            [OptionState::Wrong, OptionState::Correct, OptionState::Dimmed]
        );
        assert!(vm.locked);

        let feedback = map_feedback(&session).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_answer, "were");
        assert_eq!(feedback.headline(), "Not quite.");
    }

    #[test]
    fn summary_uses_score_display() {
        let mut session = PracticeSession::new(vec![question(1), question(2)]).unwrap();
        session.submit_answer("were").unwrap();
        session.advance();
        session.submit_answer("be").unwrap();
        session.advance();

        let summary = map_summary(&session);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.score, "5.0");
        assert_eq!(summary.percent, 50);
    }

    #[test]
    fn writing_prompt_shows_submission() {
        let item = WritingItemDraft {
            original: "They built this house in 1990.".into(),
            hint: "This house ...".into(),
            correct_answer: "This house was built in 1990.".into(),
            explanation: "Passive voice, past simple.".into(),
        }
        .validate()
        .unwrap();
        let mut session = PracticeSession::new(vec![item]).unwrap();
        session
            .submit_answer("this house was built in 1990. ")
            .unwrap();

        let vm = map_writing_prompt(&session);
        assert_eq!(vm.position_label, "Sentence 1/1");
        assert_eq!(vm.submitted.as_deref(), Some("this house was built in 1990. "));
        assert!(map_feedback(&session).unwrap().is_correct);
    }
}
