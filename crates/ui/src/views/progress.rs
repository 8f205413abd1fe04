use dioxus::prelude::*;

use crate::context::AppContext;

#[component]
pub fn ProgressView() -> Element {
    let ctx = use_context::<AppContext>();

    rsx! {
        div { class: "page progress",
            h2 { "{ctx.student_name()}'s progress" }
            p { "A snapshot of the entrance exam preparation so far." }
            div { class: "stat-grid",
                div { class: "stat-card",
                    p { class: "stat-label", "Grammar" }
                    p { class: "stat-value", "75% complete" }
                }
                div { class: "stat-card",
                    p { class: "stat-label", "Vocabulary" }
                    p { class: "stat-value", "68% complete" }
                }
                div { class: "stat-card",
                    p { class: "stat-label", "Mock exams" }
                    p { class: "stat-value", "12 solved" }
                }
            }
        }
    }
}
