use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;

use super::components::ProgressBar;

// Static showcase figures; nothing is persisted between runs.
const WEEKLY_SCORES: [(&str, &str, u32); 6] = [
    ("Week 1", "6.5", 65),
    ("Week 2", "7.2", 72),
    ("Week 3", "6.8", 68),
    ("Week 4", "8.0", 80),
    ("Week 5", "8.5", 85),
    ("Week 6", "9.2", 92),
];

const FOCUS_TOPICS: [(&str, u32); 3] = [
    ("Gerunds & Infinitives", 65),
    ("Relative Clauses", 72),
    ("Reported Speech", 58),
];

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let student = ctx.student_name().to_string();

    rsx! {
        div { class: "page dashboard",
            header { class: "dashboard-header",
                h2 { "Hi {student}!" }
                p { "Let's get one step closer to the entrance exam today." }
            }
            if !ctx.generation_enabled() {
                div { class: "error-banner", role: "alert",
                    p { "The tutor service is unavailable: set TUTOR_API_KEY to enable exercises and chat." }
                }
            }
            div { class: "stat-grid",
                div { class: "stat-card stat-primary",
                    p { class: "stat-label", "Average score" }
                    p { class: "stat-value", "8.2" }
                }
                div { class: "stat-card",
                    p { class: "stat-label", "Study time this week" }
                    p { class: "stat-value", "12.5 h" }
                }
                div { class: "stat-card",
                    p { class: "stat-label", "Mock exams finished" }
                    p { class: "stat-value", "42" }
                }
            }
            div { class: "dashboard-panels",
                section { class: "panel",
                    h3 { "Score trend" }
                    ul { class: "score-trend",
                        for (week, score, percent) in WEEKLY_SCORES {
                            li { key: "{week}",
                                span { class: "trend-label", "{week}" }
                                ProgressBar { percent }
                                span { class: "trend-score", "{score}" }
                            }
                        }
                    }
                }
                section { class: "panel",
                    h3 { "Focus topics" }
                    ul { class: "focus-topics",
                        for (topic, strength) in FOCUS_TOPICS {
                            li { key: "{topic}",
                                span { "{topic}" }
                                ProgressBar { percent: strength }
                            }
                        }
                    }
                    Link { class: "btn btn-primary", to: Route::GrammarVocab {}, "Practice now" }
                }
            }
            div { class: "quick-links",
                Link { class: "choice-card", to: Route::Tutor {}, "Ask the AI tutor" }
                Link { class: "choice-card", to: Route::ReadingWriting {}, "Reading & Writing" }
                Link { class: "choice-card", to: Route::Exam {}, "Take a mock exam" }
            }
        }
    }
}
