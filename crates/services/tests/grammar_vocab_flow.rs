use std::sync::Arc;

use serde_json::json;
use services::ai::ScriptedClient;
use services::sessions::{Advance, GrammarVocabController, GrammarVocabStage};
use services::{AppServices, Clock, FlowError};
use tutor_core::model::{AppSettings, PracticeKind};
use tutor_core::time::fixed_now;

fn conditional_questions(count: usize) -> String {
    let questions: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "question": format!("If I ___ rich, I would travel. ({n})"),
                "options": ["am", "were", "be", "been"],
                "correctAnswer": "were",
                "explanation": "Câu điều kiện loại 2 dùng 'were'.",
            })
        })
        .collect();
    serde_json::Value::Array(questions).to_string()
}

fn services(client: &Arc<ScriptedClient>) -> AppServices {
    AppServices::with_client(client.clone(), AppSettings::default(), Clock::fixed(fixed_now()))
}

#[tokio::test]
async fn perfect_topic_run_reaches_summary_and_report() {
    let client = Arc::new(ScriptedClient::with_replies([
        r#"["Conditional Sentences", "Passive Voice"]"#.to_string(),
        conditional_questions(10),
        "Kính gửi phụ huynh, Khang đã làm rất tốt...".to_string(),
    ]));
    let services = services(&client);
    let bank = services.question_bank();

    let mut controller = GrammarVocabController::new();
    controller
        .choose_kind(&bank, PracticeKind::Grammar)
        .await
        .unwrap();
    controller
        .select_topic(&bank, "Conditional Sentences")
        .await
        .unwrap();
    assert_eq!(controller.stage(), GrammarVocabStage::Practice);

    let mut finished = false;
    for _ in 0..10 {
        let outcome = controller.submit_answer("were").unwrap();
        assert!(outcome.is_correct);
        let session = controller.session().unwrap();
        assert!(session.correct_count() <= session.position() + 1);
        finished = controller.advance() == Advance::Finished;
    }
    assert!(finished);
    assert_eq!(controller.stage(), GrammarVocabStage::Summary);

    let session = controller.session().unwrap();
    assert_eq!(session.correct_count(), 10);
    assert_eq!(session.score().to_string(), "10.0");

    let metrics = controller.report_request().unwrap();
    assert_eq!(metrics.exercise, "Grammar - Topic: Conditional Sentences");
    let draft = services.reports().compose(metrics).await.unwrap();
    assert!(draft.body().starts_with("Kính gửi"));

    let sent = services.outbox().send(&draft);
    assert_eq!(sent.sent_at, fixed_now());
    assert_eq!(client.pending_replies(), 0);
}

#[tokio::test]
async fn empty_question_set_stays_on_topic_pick() {
    let client = Arc::new(ScriptedClient::with_replies([
        r#"["Conditional Sentences"]"#,
        "[]",
        r#"[{"question": "bad", "options": ["a"], "correctAnswer": "a"}]"#,
    ]));
    let services = services(&client);
    let bank = services.question_bank();

    let mut controller = GrammarVocabController::new();
    controller
        .choose_kind(&bank, PracticeKind::Vocabulary)
        .await
        .unwrap();

    let err = controller
        .select_topic(&bank, "Conditional Sentences")
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::NothingAvailable));
    assert_eq!(controller.stage(), GrammarVocabStage::TopicPick);

    // Every entry invalid counts as empty too.
    let err = controller
        .select_topic(&bank, "Conditional Sentences")
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::NothingAvailable));
    assert_eq!(controller.stage(), GrammarVocabStage::TopicPick);
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn disabled_service_reports_fetch_error() {
    let services = AppServices::from_settings(AppSettings::default(), Clock::fixed(fixed_now()));
    assert!(!services.generation_enabled());

    let mut controller = GrammarVocabController::new();
    let err = controller
        .choose_kind(&services.question_bank(), PracticeKind::Grammar)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Fetch(_)));
    assert_eq!(controller.stage(), GrammarVocabStage::Selection);
}
