use dioxus::prelude::*;
use services::SentReport;
use services::sessions::{ReadingWritingController, ReadingWritingStage};
use tutor_core::model::ReportMetrics;

use crate::context::AppContext;
use crate::vm::{
    SummaryVm, map_feedback, map_reading_feedback, map_reading_question, map_writing_prompt,
};

use super::components::{
    ErrorBanner, FeedbackPanel, LoadingPanel, ProgressBar, QuestionCard, SummaryPanel,
};
use super::report::{ReportModal, sent_label};
use super::state::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Reading,
    Writing,
}

impl Part {
    fn loading_label(self) -> &'static str {
        match self {
            Self::Reading => "Preparing reading passages...",
            Self::Writing => "Preparing rewriting exercises...",
        }
    }
}

#[component]
pub fn ReadingWritingView() -> Element {
    let ctx = use_context::<AppContext>();
    let bank = ctx.question_bank();

    let controller = use_signal(|| Some(ReadingWritingController::new()));
    let error = use_signal(|| None::<ViewError>);
    let last_part = use_signal(|| None::<Part>);
    let mut draft = use_signal(String::new);
    let mut report = use_signal(|| None::<ReportMetrics>);
    let mut sent_notice = use_signal(|| None::<String>);

    let start = use_callback(move |part: Part| {
        let bank = bank.clone();
        let mut controller = controller;
        let mut error = error;
        let mut last_part = last_part;
        spawn(async move {
            let Some(mut local) = controller.write().take() else {
                return;
            };
            last_part.set(Some(part));
            error.set(None);
            let result = match part {
                Part::Reading => local.start_reading(&bank).await,
                Part::Writing => local.start_writing(&bank).await,
            };
            controller.set(Some(local));
            if let Err(err) = result {
                tracing::warn!(%err, ?part, "reading/writing fetch failed");
                error.set(Some(ViewError::from(&err)));
            }
        });
    });

    let retry = use_callback(move |()| {
        if let Some(part) = last_part() {
            start.call(part);
        }
    });

    let pick = use_callback(move |answer: String| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            if let Err(err) = local.submit_answer(&answer) {
                tracing::debug!(%err, "answer ignored");
            }
        }
    });

    let next = use_callback(move |()| {
        let mut controller = controller;
        draft.set(String::new());
        if let Some(local) = controller.write().as_mut() {
            local.advance();
        }
    });

    let show_summary = use_callback(move |()| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            if let Err(err) = local.show_summary() {
                tracing::debug!(%err, "summary not available yet");
            }
        }
    });

    let back = use_callback(move |()| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            local.back_to_selection();
        }
    });

    let open_report = use_callback(move |()| {
        let metrics = controller
            .read()
            .as_ref()
            .and_then(|local| local.report_request().ok());
        report.set(metrics);
    });

    let guard = controller.read();
    let body = match guard.as_ref() {
        None => {
            let label = last_part().map_or("Loading...", Part::loading_label);
            rsx! { LoadingPanel { label: label.to_string() } }
        }
        Some(local) => match local.stage() {
            ReadingWritingStage::Selection => {
                let reading_done = local.reading_finished();
                let writing_done = local.writing_finished();
                let can_summarize = local.combined().is_some();
                rsx! {
                    div { class: "choice-grid",
                        button {
                            class: "choice-card",
                            r#type: "button",
                            onclick: move |_| start.call(Part::Reading),
                            h3 { "Reading comprehension" }
                            p { "Short passages with multiple-choice questions." }
                            if reading_done {
                                span { class: "badge", "Done" }
                            }
                        }
                        button {
                            class: "choice-card",
                            r#type: "button",
                            onclick: move |_| start.call(Part::Writing),
                            h3 { "Sentence rewriting" }
                            p { "Rewrite each sentence so the meaning stays the same." }
                            if writing_done {
                                span { class: "badge", "Done" }
                            }
                        }
                    }
                    if can_summarize {
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| show_summary.call(()),
                            "View results"
                        }
                    }
                }
            }
            ReadingWritingStage::Reading => match local.reading() {
                Some(session) => {
                    let cursor = session.cursor();
                    let passage_label = format!("Passage {}/{}", cursor.passage + 1, cursor.passages);
                    let passage = session.current_passage().passage().to_string();
                    let question = map_reading_question(session);
                    let feedback = map_reading_feedback(session);
                    let next_label = if session.position() + 1 == session.total() {
                        "Finish reading"
                    } else {
                        "Next question"
                    };
                    rsx! {
                        div { class: "reading",
                            div { class: "toolbar",
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: move |_| back.call(()),
                                    "Back"
                                }
                                h3 { "{passage_label}" }
                            }
                            article { class: "passage", "{passage}" }
                            QuestionCard { vm: question, on_pick: pick }
                            if let Some(vm) = feedback {
                                FeedbackPanel { vm, next_label: next_label.to_string(), on_next: next }
                            }
                        }
                    }
                }
                None => rsx! {},
            },
            ReadingWritingStage::Writing => match local.writing() {
                Some(session) => {
                    let prompt = map_writing_prompt(session);
                    let feedback = map_feedback(session);
                    let answered = prompt.submitted.is_some();
                    let next_label = if session.position() + 1 == session.total() {
                        "Finish rewriting"
                    } else {
                        "Next sentence"
                    };
                    rsx! {
                        div { class: "writing",
                            div { class: "toolbar",
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: move |_| back.call(()),
                                    "Back"
                                }
                                h3 { "{prompt.position_label}" }
                            }
                            ProgressBar { percent: prompt.progress_percent }
                            p { class: "writing-original", "{prompt.original}" }
                            if !prompt.hint.is_empty() {
                                p { class: "writing-hint", "{prompt.hint}" }
                            }
                            form {
                                class: "writing-form",
                                onsubmit: move |evt| {
                                    evt.prevent_default();
                                    pick.call(draft());
                                },
                                input {
                                    id: "writing-answer",
                                    r#type: "text",
                                    placeholder: "Type the rewritten sentence",
                                    disabled: answered,
                                    value: "{draft}",
                                    oninput: move |evt| draft.set(evt.value()),
                                }
                                button {
                                    class: "btn btn-primary",
                                    r#type: "submit",
                                    disabled: answered || draft.read().trim().is_empty(),
                                    "Check"
                                }
                            }
                            if let Some(vm) = feedback {
                                FeedbackPanel { vm, next_label: next_label.to_string(), on_next: next }
                            }
                        }
                    }
                }
                None => rsx! {},
            },
            ReadingWritingStage::Summary => match (local.combined(), local.combined_score()) {
                (Some(part), Some(score)) => {
                    let vm = SummaryVm {
                        correct: part.correct,
                        total: part.total,
                        score: score.to_string(),
                        percent: score.percent(),
                    };
                    rsx! {
                        SummaryPanel { title: "Reading & Writing results".to_string(), vm,
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| back.call(()),
                                "Practice again"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| open_report.call(()),
                                "Send report to parent"
                            }
                        }
                    }
                }
                _ => rsx! {},
            },
        },
    };
    drop(guard);

    rsx! {
        div { class: "page reading-writing",
            h2 { "Reading & Writing" }
            if let Some(err) = error() {
                ErrorBanner { error: err, on_retry: retry }
            }
            if let Some(text) = sent_notice() {
                p { class: "report-sent", role: "status", "{text}" }
            }
            {body}
            if let Some(metrics) = report() {
                ReportModal {
                    metrics,
                    on_close: move |()| report.set(None),
                    on_sent: move |sent: SentReport| sent_notice.set(Some(sent_label(&sent))),
                }
            }
        }
    }
}
