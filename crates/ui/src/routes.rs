use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{
    DashboardView, ExamView, GrammarVocabView, ProgressView, ReadingWritingView, TutorView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/tutor", TutorView)] Tutor {},
        #[route("/grammar-vocab", GrammarVocabView)] GrammarVocab {},
        #[route("/reading-writing", ReadingWritingView)] ReadingWriting {},
        #[route("/exam", ExamView)] Exam {},
        #[route("/progress", ProgressView)] Progress {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();

    rsx! {
        nav { class: "sidebar",
            h1 { "English Tutor" }
            p { class: "sidebar-student", "{ctx.student_name()}" }
            ul {
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::Tutor {}, "AI Tutor" } }
                li { Link { to: Route::GrammarVocab {}, "Grammar & Vocabulary" } }
                li { Link { to: Route::ReadingWriting {}, "Reading & Writing" } }
                li { Link { to: Route::Exam {}, "Mock Exam" } }
                li { Link { to: Route::Progress {}, "Progress" } }
            }
            if !ctx.generation_enabled() {
                p { class: "sidebar-offline", "Offline: no API key configured" }
            }
        }
    }
}
