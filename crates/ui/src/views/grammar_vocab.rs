use dioxus::prelude::*;
use services::SentReport;
use services::sessions::{GrammarVocabController, GrammarVocabStage};
use tutor_core::model::{PracticeKind, ReportMetrics};

use crate::context::AppContext;
use crate::vm::{map_feedback, map_question, map_summary};

use super::components::{ErrorBanner, FeedbackPanel, LoadingPanel, QuestionCard, SummaryPanel};
use super::report::{ReportModal, sent_label};
use super::state::ViewError;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum LastAction {
    ChooseKind(PracticeKind),
    SelectTopic(String),
}

impl LastAction {
    fn loading_label(&self) -> String {
        match self {
            Self::ChooseKind(kind) => format!("Finding {} topics...", kind.label().to_lowercase()),
            Self::SelectTopic(topic) => format!("Preparing questions on {topic}..."),
        }
    }
}

#[component]
pub fn GrammarVocabView() -> Element {
    let ctx = use_context::<AppContext>();
    let bank = ctx.question_bank();

    // `None` while a fetch owns the controller.
    let controller = use_signal(|| Some(GrammarVocabController::new()));
    let error = use_signal(|| None::<ViewError>);
    let last_action = use_signal(|| None::<LastAction>);
    let mut report = use_signal(|| None::<ReportMetrics>);
    let mut sent_notice = use_signal(|| None::<String>);

    let run = use_callback(move |action: LastAction| {
        let bank = bank.clone();
        let mut controller = controller;
        let mut error = error;
        let mut last_action = last_action;
        spawn(async move {
            let Some(mut local) = controller.write().take() else {
                return;
            };
            last_action.set(Some(action.clone()));
            error.set(None);
            let result = match &action {
                LastAction::ChooseKind(kind) => local.choose_kind(&bank, *kind).await,
                LastAction::SelectTopic(topic) => local.select_topic(&bank, topic).await,
            };
            controller.set(Some(local));
            if let Err(err) = result {
                tracing::warn!(%err, ?action, "grammar/vocabulary fetch failed");
                error.set(Some(ViewError::from(&err)));
            }
        });
    });

    let retry = use_callback(move |()| {
        if let Some(action) = last_action() {
            run.call(action);
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
        if let Some(local) = controller.write().as_mut() {
            local.advance();
        }
    });

    let back_to_topics = use_callback(move |()| {
        let mut controller = controller;
        let mut error = error;
        error.set(None);
        if let Some(local) = controller.write().as_mut() {
            local.back_to_topics();
        }
    });

    let back_to_selection = use_callback(move |()| {
        let mut controller = controller;
        let mut error = error;
        error.set(None);
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

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<GrammarVocabTestHandles>() {
                handles.register(run, pick, next, open_report);
            }
        }
    }

    let guard = controller.read();
    let body = match guard.as_ref() {
        None => {
            let label = last_action
                .read()
                .as_ref()
                .map_or_else(|| "Loading...".to_string(), LastAction::loading_label);
            rsx! { LoadingPanel { label } }
        }
        Some(local) => match local.stage() {
            GrammarVocabStage::Selection => rsx! {
                div { class: "choice-grid",
                    for kind in [PracticeKind::Grammar, PracticeKind::Vocabulary] {
                        button {
                            key: "{kind.label()}",
                            class: "choice-card",
                            r#type: "button",
                            onclick: move |_| run.call(LastAction::ChooseKind(kind)),
                            h3 { "{kind.label()}" }
                            p { "Practice by topic, 10 questions at a time." }
                        }
                    }
                }
            },
            GrammarVocabStage::TopicPick => {
                let kind = local.kind().map_or("", PracticeKind::label);
                let topics = local.topics().to_vec();
                rsx! {
                    div { class: "topic-pick",
                        div { class: "toolbar",
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| back_to_selection.call(()),
                                "Back"
                            }
                            h3 { "{kind} topics" }
                        }
                        ul { class: "topic-list",
                            for topic in topics {
                                li { key: "{topic}",
                                    button {
                                        class: "topic-button",
                                        r#type: "button",
                                        onclick: {
                                            let topic = topic.clone();
                                            move |_| run.call(LastAction::SelectTopic(topic.clone()))
                                        },
                                        "{topic}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
            GrammarVocabStage::Practice => match local.session() {
                Some(session) => {
                    let question = map_question(session);
                    let feedback = map_feedback(session);
                    let topic = local.topic().unwrap_or_default().to_string();
                    let next_label = if session.position() + 1 == session.total() {
                        "See results"
                    } else {
                        "Next question"
                    };
                    rsx! {
                        div { class: "practice",
                            div { class: "toolbar",
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: move |_| back_to_topics.call(()),
                                    "Topics"
                                }
                                h3 { "{topic}" }
                            }
                            QuestionCard { vm: question, on_pick: pick }
                            if let Some(vm) = feedback {
                                FeedbackPanel { vm, next_label: next_label.to_string(), on_next: next }
                            }
                        }
                    }
                }
                None => rsx! {},
            },
            GrammarVocabStage::Summary => match local.session() {
                Some(session) => {
                    let vm = map_summary(session);
                    let title = format!("{} complete", local.topic().unwrap_or("Topic"));
                    rsx! {
                        SummaryPanel { title, vm,
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| back_to_topics.call(()),
                                "Choose another topic"
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
                None => rsx! {},
            },
        },
    };
    drop(guard);

    rsx! {
        div { class: "page grammar-vocab",
            h2 { "Grammar & Vocabulary" }
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

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct GrammarVocabTestHandles {
    run: Rc<RefCell<Option<Callback<LastAction>>>>,
    pick: Rc<RefCell<Option<Callback<String>>>>,
    next: Rc<RefCell<Option<Callback<()>>>>,
    open_report: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl GrammarVocabTestHandles {
    fn register(
        &self,
        run: Callback<LastAction>,
        pick: Callback<String>,
        next: Callback<()>,
        open_report: Callback<()>,
    ) {
        *self.run.borrow_mut() = Some(run);
        *self.pick.borrow_mut() = Some(pick);
        *self.next.borrow_mut() = Some(next);
        *self.open_report.borrow_mut() = Some(open_report);
    }

    pub(crate) fn choose_kind(&self, kind: PracticeKind) {
        (*self.run.borrow())
            .expect("grammar run registered")
            .call(LastAction::ChooseKind(kind));
    }

    pub(crate) fn select_topic(&self, topic: &str) {
        (*self.run.borrow())
            .expect("grammar run registered")
            .call(LastAction::SelectTopic(topic.to_string()));
    }

    pub(crate) fn pick(&self, answer: &str) {
        (*self.pick.borrow())
            .expect("grammar pick registered")
            .call(answer.to_string());
    }

    pub(crate) fn next(&self) {
        (*self.next.borrow()).expect("grammar next registered").call(());
    }

    pub(crate) fn open_report(&self) {
        (*self.open_report.borrow())
            .expect("grammar report registered")
            .call(());
    }
}
