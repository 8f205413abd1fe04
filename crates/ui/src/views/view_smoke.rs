use serde_json::json;
use tutor_core::model::{PracticeKind, ReportMetrics};

use std::sync::atomic::Ordering;

use super::test_harness::{
    STUDENT, ViewKind, setup_counting_microphone_harness, setup_denied_microphone_harness,
    setup_offline_harness, setup_view_harness,
};

fn conditional_questions(count: usize) -> String {
    let questions: Vec<_> = (1..=count)
        .map(|n| {
            json!({
                "question": format!("If I ___ rich, I would travel. ({n})"),
                "options": ["am", "were", "be", "been"],
                "correctAnswer": "were",
                "explanation": "Type 2 conditionals use were.",
            })
        })
        .collect();
    serde_json::Value::Array(questions).to_string()
}

const TOPICS: &str = r#"["Conditional Sentences", "Passive Voice"]"#;

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_greets_student() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, Vec::<String>::new());
    harness.rebuild();
    let html = harness.render();
    let expected = format!("Hi {STUDENT}!");
    assert!(html.contains(&expected), "missing {expected} in {html}");
    assert!(html.contains("Average score"), "missing stats in {html}");
    assert!(!html.contains("TUTOR_API_KEY"), "unexpected offline banner in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_flags_missing_api_key() {
    let mut harness = setup_offline_harness(ViewKind::Dashboard);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("TUTOR_API_KEY"), "missing offline banner in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_renders_snapshot() {
    let mut harness = setup_view_harness(ViewKind::Progress, Vec::<String>::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("75% complete"), "missing grammar figure in {html}");
    assert!(html.contains("12 solved"), "missing exam figure in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_smoke_renders_intro() {
    let mut harness = setup_view_harness(ViewKind::Exam, Vec::<String>::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start exam"), "missing start button in {html}");
    assert!(html.contains("Reading: 20 questions"), "missing structure in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn reading_writing_view_smoke_offers_both_parts() {
    let mut harness = setup_view_harness(ViewKind::ReadingWriting, Vec::<String>::new());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Reading comprehension"), "missing reading card in {html}");
    assert!(html.contains("Sentence rewriting"), "missing writing card in {html}");
    assert!(!html.contains("View results"), "results offered too early in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_smoke_shows_greeting() {
    let mut harness = setup_view_harness(ViewKind::Tutor, Vec::<String>::new());
    harness.rebuild();
    let html = harness.render();
    let expected = format!("Hi {STUDENT}!");
    assert!(html.contains(&expected), "missing greeting in {html}");
    assert!(html.contains("Hold to speak"), "missing voice button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_text_turn_shows_reply() {
    let mut harness = setup_view_harness(ViewKind::Tutor, ["Use were for every subject."]);
    harness.rebuild();

    harness.act(|handles| handles.tutor.type_and_send("Why were and not was"));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Why were and not was"), "missing user bubble in {html}");
    assert!(html.contains("Use were for every subject."), "missing reply in {html}");
    assert!(!html.contains("Your tutor is typing"), "still pending in {html}");
    assert_eq!(harness.client.requests().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_denied_microphone_shows_notice() {
    let mut harness = setup_denied_microphone_harness(ViewKind::Tutor);
    harness.rebuild();

    harness.act(|handles| handles.tutor.press_microphone());
    harness.drive_async().await;
    harness.act(|handles| handles.tutor.release_microphone());
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Microphone blocked"), "missing notice in {html}");
    assert!(!html.contains("Recording..."), "still recording in {html}");
    assert!(html.contains(&format!("Hi {STUDENT}!")), "greeting lost in {html}");
    assert!(harness.client.requests().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_voice_turn_sends_recording() {
    let mut harness = setup_view_harness(ViewKind::Tutor, ["I heard you."]);
    harness.rebuild();

    harness.act(|handles| handles.tutor.press_microphone());
    harness.drive_async().await;
    harness.act(|handles| handles.tutor.release_microphone());
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Voice message"), "missing voice bubble in {html}");
    assert!(html.contains("I heard you."), "missing reply in {html}");
    let requests = harness.client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].turns.last().map(|turn| turn.parts.len()), Some(2));
}

#[tokio::test(flavor = "current_thread")]
async fn tutor_view_quick_presses_open_the_microphone_once() {
    let (mut harness, microphone) = setup_counting_microphone_harness(ViewKind::Tutor);
    harness.rebuild();

    // Release and press again before the first open has finished.
    harness.act(|handles| handles.tutor.press_microphone());
    harness.act(|handles| handles.tutor.release_microphone());
    harness.act(|handles| handles.tutor.press_microphone());
    harness.drive_async().await;
    harness.act(|handles| handles.tutor.release_microphone());
    harness.drive_async().await;

    let opens = microphone.opens.load(Ordering::SeqCst);
    let closes = microphone.closes.load(Ordering::SeqCst);
    assert_eq!(opens, 1);
    assert_eq!(closes, opens);

    let html = harness.render();
    assert!(!html.contains("Recording..."), "still recording in {html}");
    assert!(html.contains("Got it."), "missing reply in {html}");

    // The recorder is free again afterwards.
    harness.act(|handles| handles.tutor.press_microphone());
    harness.drive_async().await;
    harness.act(|handles| handles.tutor.release_microphone());
    harness.drive_async().await;
    assert_eq!(microphone.opens.load(Ordering::SeqCst), 2);
    assert_eq!(microphone.closes.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn grammar_view_wrong_answer_shows_feedback() {
    let mut harness = setup_view_harness(
        ViewKind::GrammarVocab,
        [TOPICS.to_string(), conditional_questions(10)],
    );
    harness.rebuild();

    harness.act(|handles| handles.grammar.choose_kind(PracticeKind::Grammar));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Passive Voice"), "missing topics in {html}");

    harness.act(|handles| handles.grammar.select_topic("Conditional Sentences"));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 1/10"), "missing question in {html}");

    harness.act(|handles| handles.grammar.pick("am"));
    let html = harness.render();
    assert!(html.contains("Not quite."), "missing feedback in {html}");
    assert!(html.contains("Answer: were"), "missing correct answer in {html}");

    harness.act(|handles| handles.grammar.next());
    let html = harness.render();
    assert!(html.contains("Question 2/10"), "did not advance in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn grammar_view_full_run_reaches_summary() {
    let mut harness = setup_view_harness(
        ViewKind::GrammarVocab,
        [TOPICS.to_string(), conditional_questions(10)],
    );
    harness.rebuild();

    harness.act(|handles| handles.grammar.choose_kind(PracticeKind::Grammar));
    harness.drive_async().await;
    harness.act(|handles| handles.grammar.select_topic("Conditional Sentences"));
    harness.drive_async().await;
    for _ in 0..10 {
        harness.act(|handles| handles.grammar.pick("were"));
        harness.act(|handles| handles.grammar.next());
    }

    let html = harness.render();
    assert!(html.contains("10.0"), "missing score in {html}");
    assert!(html.contains("Correct: 10/10"), "missing count in {html}");
    assert!(html.contains("Send report to parent"), "missing report button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn sending_a_report_closes_the_modal() {
    let mut harness = setup_view_harness(
        ViewKind::GrammarVocab,
        [
            TOPICS.to_string(),
            conditional_questions(10),
            "Dear parent, Minh finished the topic.".to_string(),
        ],
    );
    harness.rebuild();

    harness.act(|handles| handles.grammar.choose_kind(PracticeKind::Grammar));
    harness.drive_async().await;
    harness.act(|handles| handles.grammar.select_topic("Conditional Sentences"));
    harness.drive_async().await;
    for _ in 0..10 {
        harness.act(|handles| handles.grammar.pick("were"));
        harness.act(|handles| handles.grammar.next());
    }
    harness.act(|handles| handles.grammar.open_report());
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Dear parent"), "missing draft in {html}");

    harness.act(|handles| handles.report.send());
    let html = harness.render();
    assert!(!html.contains("report-modal"), "modal still open in {html}");
    assert!(!html.contains("Dear parent"), "draft still shown in {html}");
    assert!(html.contains("Report marked as sent"), "missing confirmation in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn grammar_view_empty_topic_stays_on_topic_list() {
    let mut harness = setup_view_harness(ViewKind::GrammarVocab, [TOPICS, "[]"]);
    harness.rebuild();

    harness.act(|handles| handles.grammar.choose_kind(PracticeKind::Vocabulary));
    harness.drive_async().await;
    harness.act(|handles| handles.grammar.select_topic("Passive Voice"));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("No exercises came back"), "missing empty notice in {html}");
    assert!(html.contains("Vocabulary topics"), "left the topic list in {html}");
    assert!(html.contains("Try again"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn grammar_view_offline_reports_unavailable() {
    let mut harness = setup_offline_harness(ViewKind::GrammarVocab);
    harness.rebuild();

    harness.act(|handles| handles.grammar.choose_kind(PracticeKind::Grammar));
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("no API key is configured"), "missing unavailable notice in {html}");
    assert!(html.contains("Vocabulary"), "left the selection in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn report_modal_renders_draft_and_sends() {
    let metrics = ReportMetrics::new(
        "Grammar - Topic: Conditional Sentences",
        10,
        10,
        vec!["Conditional Sentences".into()],
    );
    let mut harness = setup_view_harness(
        ViewKind::Report(metrics),
        ["Dear parent, **Minh** did very well today."],
    );
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("<strong>Minh</strong>"), "missing draft in {html}");
    assert!(html.contains("Send to parent"), "missing send button in {html}");
    let prompt = harness.client.requests()[0].last_user_text().unwrap_or_default().to_string();
    assert!(prompt.contains("Conditional Sentences"), "metrics missing from {prompt}");
}
