use dioxus::prelude::*;

use crate::vm::{FeedbackVm, QuestionVm, SummaryVm};

use super::state::ViewError;

#[component]
pub fn LoadingPanel(label: String) -> Element {
    rsx! {
        div { class: "loading-panel",
            div { class: "spinner" }
            p { "{label}" }
        }
    }
}

/// Error text plus a retry button; fetch failures are always retryable.
#[component]
pub fn ErrorBanner(error: ViewError, on_retry: Callback<()>) -> Element {
    rsx! {
        div { class: "error-banner", role: "alert",
            p { "{error.message()}" }
            if error != ViewError::Unavailable {
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_retry.call(()),
                    "Try again"
                }
            }
        }
    }
}

#[component]
pub fn ProgressBar(percent: u32) -> Element {
    let percent = percent.min(100);
    rsx! {
        div { class: "progress-track",
            div { class: "progress-fill", style: "width: {percent}%;" }
        }
    }
}

#[component]
pub fn QuestionCard(vm: QuestionVm, on_pick: Callback<String>) -> Element {
    rsx! {
        div { class: "question-card",
            div { class: "question-meta",
                span { "{vm.position_label}" }
            }
            ProgressBar { percent: vm.progress_percent }
            h3 { class: "question-prompt", "{vm.prompt}" }
            div { class: "options",
                for option in vm.options {
                    button {
                        key: "{option.text}",
                        class: option.state.class(),
                        r#type: "button",
                        disabled: vm.locked,
                        onclick: {
                            let text = option.text.clone();
                            move |_| on_pick.call(text.clone())
                        },
                        "{option.text}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn FeedbackPanel(vm: FeedbackVm, next_label: String, on_next: Callback<()>) -> Element {
    let class = if vm.is_correct {
        "feedback feedback-correct"
    } else {
        "feedback feedback-wrong"
    };
    rsx! {
        div { class,
            h4 { "{vm.headline()}" }
            if !vm.is_correct {
                p { class: "feedback-answer", "Answer: {vm.correct_answer}" }
            }
            if !vm.explanation.is_empty() {
                p { class: "feedback-explanation", "{vm.explanation}" }
            }
            button {
                id: "practice-next",
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_next.call(()),
                "{next_label}"
            }
        }
    }
}

#[component]
pub fn SummaryPanel(title: String, vm: SummaryVm, children: Element) -> Element {
    rsx! {
        div { class: "summary-panel",
            h3 { "{title}" }
            p { class: "summary-score", "{vm.score}" }
            p { "Correct: {vm.correct}/{vm.total}" }
            ProgressBar { percent: vm.percent }
            div { class: "summary-actions", {children} }
        }
    }
}
