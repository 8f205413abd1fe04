use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use services::ai::ScriptedClient;
use services::sessions::{ExamController, ExamStage, QuestionStatus};
use services::{AppServices, Clock};
use tutor_core::model::{AppSettings, ExamSection};
use tutor_core::time::{fixed_now, format_duration};

fn mock_exam() -> String {
    let parts = [
        ("Phonetics", 4),
        ("Grammar & Vocabulary", 8),
        ("Reading", 20),
        ("Writing", 8),
    ];
    let mut questions = Vec::new();
    for (part, count) in parts {
        for n in 0..count {
            questions.push(json!({
                "question": format!("{part} question {n}"),
                "options": ["A. one", "B. two", "C. three", "D. four"],
                "correctAnswer": "B. two",
                "explanation": "Giải thích.",
                "topic": format!("{part} topic {}", n % 3),
                "part": part,
            }));
        }
    }
    serde_json::Value::Array(questions).to_string()
}

#[tokio::test]
async fn unanswered_exam_scores_zero() {
    let client = Arc::new(ScriptedClient::with_replies([mock_exam()]));
    let services = AppServices::with_client(client, AppSettings::default(), Clock::fixed(fixed_now()));

    let mut controller = ExamController::new();
    controller
        .start(&services.question_bank(), fixed_now())
        .await
        .unwrap();
    let session = controller.session().unwrap();
    assert_eq!(session.total(), 40);
    assert_eq!(session.current_section(), Some(&ExamSection::Phonetics));

    controller.request_submit().unwrap();
    let result = controller
        .confirm_submit(fixed_now() + Duration::seconds(754))
        .unwrap()
        .clone();
    assert_eq!(result.correct, 0);
    assert_eq!(result.unanswered, 40);
    assert_eq!(result.score.to_string(), "0.0");
    assert_eq!(format_duration(result.duration), "12 min 34 s");
    assert_eq!(result.topics.len(), 5);
    assert_eq!(controller.stage(), ExamStage::Submitted);
}

#[tokio::test]
async fn graded_exam_marks_each_question() {
    let client = Arc::new(ScriptedClient::with_replies([mock_exam()]));
    let services = AppServices::with_client(client, AppSettings::default(), Clock::fixed(fixed_now()));

    let mut controller = ExamController::new();
    controller
        .start(&services.question_bank(), fixed_now())
        .await
        .unwrap();

    let session = controller.session_mut().unwrap();
    for index in 0..27 {
        session.jump_to(index).unwrap();
        session.select_answer("B. two").unwrap();
    }
    session.jump_to(27).unwrap();
    session.select_answer("A. one").unwrap();

    controller.request_submit().unwrap();
    let result = controller.confirm_submit(fixed_now()).unwrap().clone();
    assert_eq!(result.correct, 27);
    assert_eq!(result.wrong, 1);
    assert_eq!(result.unanswered, 12);
    assert_eq!(result.score.to_string(), "6.8");

    let session = controller.session().unwrap();
    assert_eq!(session.question_status(0), QuestionStatus::Correct);
    assert_eq!(session.question_status(27), QuestionStatus::Incorrect);
    assert_eq!(session.question_status(39), QuestionStatus::Unanswered);

    let metrics = controller.report_request().unwrap();
    assert_eq!(metrics.total, 40);
    assert_eq!(metrics.exercise, "Full mock exam (entrance exam structure)");
}
