use dioxus::document::eval;
use dioxus::prelude::*;
use services::SentReport;
use services::sessions::{ExamController, ExamStage};
use tutor_core::model::ReportMetrics;

use crate::context::AppContext;
use crate::vm::{
    ExamQuestionVm, ExamResultVm, NavCellVm, map_exam_question, map_exam_result, map_navigator,
};

use super::super::components::{ErrorBanner, LoadingPanel, ProgressBar};
use super::super::report::{ReportModal, sent_label};
use super::super::state::ViewError;
use super::scripts::exam_timer_script;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Move {
    Previous,
    Next,
    Jump(usize),
}

#[component]
pub fn ExamView() -> Element {
    let ctx = use_context::<AppContext>();
    let bank = ctx.question_bank();
    let clock = ctx.clock();

    let controller = use_signal(|| Some(ExamController::new()));
    let error = use_signal(|| None::<ViewError>);
    let mut report = use_signal(|| None::<ReportMetrics>);
    let mut sent_notice = use_signal(|| None::<String>);

    let start = use_callback(move |()| {
        let bank = bank.clone();
        let mut controller = controller;
        let mut error = error;
        spawn(async move {
            let Some(mut local) = controller.write().take() else {
                return;
            };
            error.set(None);
            let result = local.start(&bank, clock.now()).await;
            controller.set(Some(local));
            if let Err(err) = result {
                tracing::warn!(%err, "exam fetch failed");
                error.set(Some(ViewError::from(&err)));
            }
        });
    });

    let select = use_callback(move |option: String| {
        let mut controller = controller;
        if let Some(session) = controller.write().as_mut().and_then(ExamController::session_mut) {
            if let Err(err) = session.select_answer(&option) {
                tracing::debug!(%err, "selection ignored");
            }
        }
    });

    let navigate = use_callback(move |step: Move| {
        let mut controller = controller;
        if let Some(session) = controller.write().as_mut().and_then(ExamController::session_mut) {
            match step {
                Move::Previous => {
                    session.previous();
                }
                Move::Next => {
                    session.next();
                }
                Move::Jump(index) => {
                    if let Err(err) = session.jump_to(index) {
                        tracing::debug!(%err, "jump ignored");
                    }
                }
            }
        }
    });

    let request_submit = use_callback(move |()| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            if let Err(err) = local.request_submit() {
                tracing::debug!(%err, "submit request ignored");
            }
        }
    });

    let cancel_submit = use_callback(move |()| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            local.cancel_submit();
        }
    });

    let confirm_submit = use_callback(move |()| {
        let mut controller = controller;
        if let Some(local) = controller.write().as_mut() {
            if let Err(err) = local.confirm_submit(clock.now()) {
                tracing::warn!(%err, "exam submission failed");
            }
        }
    });

    let open_report = use_callback(move |()| {
        let metrics = controller
            .read()
            .as_ref()
            .and_then(|local| local.report_request().ok());
        report.set(metrics);
    });

    let timer = timer_state(controller.read().as_ref());
    use_effect(move || {
        let (started_at_ms, running) = timer_state(controller.read().as_ref()).unwrap_or((0, false));
        let _ = eval(&exam_timer_script(started_at_ms, running));
    });

    let guard = controller.read();
    let body = match guard.as_ref() {
        None => rsx! { LoadingPanel { label: "Building your mock exam...".to_string() } },
        Some(local) => match (local.stage(), local.session()) {
            (ExamStage::NotStarted, _) | (_, None) => rsx! {
                div { class: "exam-intro",
                    p { "A full mock entrance exam: 40 questions in four parts." }
                    ul {
                        li { "Phonetics: 4 questions" }
                        li { "Grammar & Vocabulary: 8 questions" }
                        li { "Reading: 20 questions" }
                        li { "Writing: 8 questions" }
                    }
                    button {
                        id: "exam-start",
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| start.call(()),
                        "Start exam"
                    }
                }
            },
            (stage, Some(session)) => {
                let question = map_exam_question(session);
                let cells = map_navigator(session);
                let result = local.result().map(map_exam_result);
                let confirming = stage == ExamStage::ConfirmingSubmit;
                let unanswered = session.total().saturating_sub(session.answered_count());
                rsx! {
                    if let Some(result) = result {
                        ExamResultPanel {
                            result,
                            on_restart: start,
                            on_report: open_report,
                        }
                    }
                    div { class: "exam-layout",
                        ExamQuestion {
                            vm: question,
                            submitted: stage == ExamStage::Submitted,
                            on_select: select,
                            on_move: navigate,
                        }
                        ExamNavigator {
                            cells,
                            submitted: stage == ExamStage::Submitted,
                            on_move: navigate,
                            on_submit: request_submit,
                        }
                    }
                    if confirming {
                        div {
                            class: "modal-overlay",
                            onclick: move |_| cancel_submit.call(()),
                            div {
                                class: "modal",
                                onclick: move |evt| evt.stop_propagation(),
                                h3 { class: "modal-title", "Submit the exam?" }
                                if unanswered > 0 {
                                    p { class: "modal-body",
                                        "{unanswered} questions are still unanswered and will count as wrong."
                                    }
                                } else {
                                    p { class: "modal-body", "Every question has an answer." }
                                }
                                div { class: "modal-actions",
                                    button {
                                        class: "btn",
                                        r#type: "button",
                                        onclick: move |_| cancel_submit.call(()),
                                        "Keep working"
                                    }
                                    button {
                                        id: "exam-confirm-submit",
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: move |_| confirm_submit.call(()),
                                        "Submit"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    };
    drop(guard);

    rsx! {
        div { class: "page exam",
            div { class: "toolbar",
                h2 { "Mock Exam" }
                if timer.is_some_and(|(_, running)| running) {
                    span { id: "exam-timer", class: "exam-timer", "0:00" }
                }
            }
            if let Some(err) = error() {
                ErrorBanner { error: err, on_retry: start }
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

/// Exam start in epoch millis and whether the clock is still running.
fn timer_state(controller: Option<&ExamController>) -> Option<(i64, bool)> {
    let local = controller?;
    let running = matches!(
        local.stage(),
        ExamStage::InProgress | ExamStage::ConfirmingSubmit
    );
    local
        .session()
        .map(|session| (session.started_at().timestamp_millis(), running))
}

#[component]
fn ExamQuestion(
    vm: ExamQuestionVm,
    submitted: bool,
    on_select: Callback<String>,
    on_move: Callback<Move>,
) -> Element {
    let percent = u32::try_from(vm.answered * 100 / vm.total.max(1)).unwrap_or(100);
    rsx! {
        div { class: "question-card exam-question",
            div { class: "question-meta",
                span { "Question {vm.number}/{vm.total}" }
                if let Some(section) = vm.section.clone() {
                    span { class: "badge", "{section}" }
                }
                span { "Answered: {vm.answered}/{vm.total}" }
            }
            ProgressBar { percent }
            h3 { class: "question-prompt", "{vm.prompt}" }
            div { class: "options",
                for option in vm.options {
                    button {
                        key: "{option.text}",
                        class: option.state.class(),
                        r#type: "button",
                        disabled: submitted,
                        onclick: {
                            let text = option.text.clone();
                            move |_| on_select.call(text.clone())
                        },
                        "{option.text}"
                    }
                }
            }
            if let Some(explanation) = vm.explanation.clone() {
                p { class: "feedback-explanation", "{explanation}" }
            }
            div { class: "exam-move",
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: !vm.can_go_back,
                    onclick: move |_| on_move.call(Move::Previous),
                    "Previous"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: !vm.can_go_forward,
                    onclick: move |_| on_move.call(Move::Next),
                    "Next"
                }
            }
        }
    }
}

#[component]
fn ExamNavigator(
    cells: Vec<NavCellVm>,
    submitted: bool,
    on_move: Callback<Move>,
    on_submit: Callback<()>,
) -> Element {
    rsx! {
        aside { class: "exam-navigator",
            div { class: "nav-grid",
                for cell in cells {
                    button {
                        key: "{cell.index}",
                        class: cell.class,
                        r#type: "button",
                        onclick: move |_| on_move.call(Move::Jump(cell.index)),
                        "{cell.label}"
                    }
                }
            }
            if !submitted {
                button {
                    id: "exam-submit",
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_submit.call(()),
                    "Submit exam"
                }
            }
        }
    }
}

#[component]
fn ExamResultPanel(result: ExamResultVm, on_restart: Callback<()>, on_report: Callback<()>) -> Element {
    let topics = result.topics.join(", ");
    rsx! {
        div { class: "summary-panel exam-result",
            h3 { "Exam results" }
            p { class: "summary-score", "{result.score}" }
            ProgressBar { percent: result.percent }
            ul { class: "result-stats",
                li { "Correct: {result.correct}" }
                li { "Wrong: {result.wrong}" }
                li { "Unanswered: {result.unanswered}" }
                li { "Time: {result.duration}" }
            }
            if !topics.is_empty() {
                p { class: "result-topics", "Topics covered: {topics}" }
            }
            div { class: "summary-actions",
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_restart.call(()),
                    "New exam"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_report.call(()),
                    "Send report to parent"
                }
            }
        }
    }
}
