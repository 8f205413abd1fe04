use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::ai::ScriptedClient;
use services::{AppServices, CaptureError, CapturedAudio, Clock, Microphone};
use tutor_core::model::{AppSettings, AppSettingsDraft, ReportMetrics};
use tutor_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::grammar_vocab::GrammarVocabTestHandles;
use crate::views::report::{ReportModal, ReportTestHandles};
use crate::views::tutor::TutorTestHandles;
use crate::views::{
    DashboardView, ExamView, GrammarVocabView, ProgressView, ReadingWritingView, TutorView,
};

pub const STUDENT: &str = "Minh";

/// Microphone that either denies access or hands back a fixed clip.
#[derive(Clone, Copy, Debug)]
pub struct FakeMicrophone {
    pub deny: bool,
}

#[async_trait(?Send)]
impl Microphone for FakeMicrophone {
    async fn open(&self) -> Result<(), CaptureError> {
        if self.deny {
            Err(CaptureError::PermissionDenied)
        } else {
            Ok(())
        }
    }

    async fn close(&self) -> Result<CapturedAudio, CaptureError> {
        Ok(CapturedAudio {
            mime_type: "audio/webm".into(),
            bytes: vec![0x1a, 0x45, 0xdf, 0xa3],
        })
    }
}

/// Counts device opens and closes; `open` yields once so presses can pile up.
#[derive(Debug, Default)]
pub struct CountingMicrophone {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

#[async_trait(?Send)]
impl Microphone for CountingMicrophone {
    async fn open(&self) -> Result<(), CaptureError> {
        tokio::task::yield_now().await;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<CapturedAudio, CaptureError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(CapturedAudio {
            mime_type: "audio/webm".into(),
            bytes: vec![0x1a, 0x45, 0xdf, 0xa3],
        })
    }
}

struct TestApp {
    services: AppServices,
    microphone: Arc<dyn Microphone + Send + Sync>,
}

impl UiApp for TestApp {
    fn services(&self) -> &AppServices {
        &self.services
    }

    fn microphone(&self) -> Arc<dyn Microphone + Send + Sync> {
        self.microphone.clone()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    Dashboard,
    Tutor,
    GrammarVocab,
    ReadingWriting,
    Exam,
    Progress,
    Report(ReportMetrics),
}

#[derive(Clone, Default)]
pub struct TestHandles {
    pub grammar: GrammarVocabTestHandles,
    pub tutor: TutorTestHandles,
    pub report: ReportTestHandles,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: TestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.handles.grammar.clone());
    use_context_provider(|| props.handles.tutor.clone());
    use_context_provider(|| props.handles.report.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Tutor => rsx! { TutorView {} },
        ViewKind::GrammarVocab => rsx! { GrammarVocabView {} },
        ViewKind::ReadingWriting => rsx! { ReadingWritingView {} },
        ViewKind::Exam => rsx! { ExamView {} },
        ViewKind::Progress => rsx! { ProgressView {} },
        ViewKind::Report(metrics) => rsx! {
            ReportModal { metrics, on_close: move |()| {}, on_sent: move |_| {} }
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub client: Arc<ScriptedClient>,
    pub handles: TestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Runs `f` inside the dom's runtime, then renders the result.
    pub fn act(&mut self, f: impl FnOnce(&TestHandles)) {
        let handles = self.handles.clone();
        self.dom.in_runtime(|| f(&handles));
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn settings() -> AppSettings {
    AppSettingsDraft {
        student_name: Some(STUDENT.into()),
        ..AppSettingsDraft::new()
    }
    .validate()
    .expect("valid settings")
}

fn harness(
    view: ViewKind,
    services: AppServices,
    client: Arc<ScriptedClient>,
    microphone: Arc<dyn Microphone + Send + Sync>,
) -> ViewHarness {
    let app = Arc::new(TestApp {
        services,
        microphone,
    });
    let handles = TestHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
        },
    );
    ViewHarness {
        dom,
        client,
        handles,
    }
}

/// Harness whose generation client answers with `replies`, in order.
pub fn setup_view_harness<I, S>(view: ViewKind, replies: I) -> ViewHarness
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let client = Arc::new(ScriptedClient::with_replies(replies));
    let services = AppServices::with_client(client.clone(), settings(), Clock::fixed(fixed_now()));
    harness(view, services, client, Arc::new(FakeMicrophone { deny: false }))
}

/// Harness with a microphone that refuses access.
pub fn setup_denied_microphone_harness(view: ViewKind) -> ViewHarness {
    let client = Arc::new(ScriptedClient::new());
    let services = AppServices::with_client(client.clone(), settings(), Clock::fixed(fixed_now()));
    harness(view, services, client, Arc::new(FakeMicrophone { deny: true }))
}

/// Harness whose microphone reports how often it was opened and closed.
pub fn setup_counting_microphone_harness(
    view: ViewKind,
) -> (ViewHarness, Arc<CountingMicrophone>) {
    let client = Arc::new(ScriptedClient::with_replies(["Got it.", "Got it again."]));
    let services = AppServices::with_client(client.clone(), settings(), Clock::fixed(fixed_now()));
    let microphone = Arc::new(CountingMicrophone::default());
    (harness(view, services, client, microphone.clone()), microphone)
}

/// Harness without an API key: every request fails as unavailable.
pub fn setup_offline_harness(view: ViewKind) -> ViewHarness {
    let services = AppServices::from_settings(settings(), Clock::fixed(fixed_now()));
    harness(
        view,
        services,
        Arc::new(ScriptedClient::new()),
        Arc::new(FakeMicrophone { deny: false }),
    )
}
