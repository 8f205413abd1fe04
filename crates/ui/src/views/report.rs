use dioxus::prelude::*;
use services::SentReport;
use tutor_core::model::{ReportDraft, ReportMetrics};

use crate::context::AppContext;
use crate::vm::{format_datetime, markdown_to_html};

use super::state::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct ReportPreview {
    html: String,
    draft: ReportDraft,
}

pub(crate) fn sent_label(sent: &SentReport) -> String {
    let at = format_datetime(sent.sent_at);
    match sent.recipient.as_deref() {
        Some(recipient) => format!("Report sent to {recipient} at {at}."),
        None => format!("Report marked as sent at {at}. No recipient is configured."),
    }
}

/// Drafts a parent report for a finished exercise. Sending hands the receipt
/// to `on_sent` and closes the modal, discarding the draft.
#[component]
pub fn ReportModal(
    metrics: ReportMetrics,
    on_close: Callback<()>,
    on_sent: Callback<SentReport>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let reports = ctx.reports();
    let outbox = ctx.outbox();

    let mut resource = use_resource(move || {
        let reports = reports.clone();
        let metrics = metrics.clone();
        async move {
            let draft = reports
                .compose(metrics)
                .await
                .map_err(|err| ViewError::from(&err))?;
            Ok::<_, ViewError>(ReportPreview {
                html: markdown_to_html(draft.body()),
                draft,
            })
        }
    });

    let send = use_callback(move |()| {
        let Some(Ok(preview)) = resource.value().read().clone() else {
            return;
        };
        let sent = outbox.send(&preview.draft);
        on_sent.call(sent);
        on_close.call(());
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ReportTestHandles>() {
                *handles.send.borrow_mut() = Some(send);
            }
        }
    }

    let state = view_state_from_resource(&resource);

    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal report-modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "Progress report" }
                match state {
                    ViewState::Idle | ViewState::Loading => rsx! {
                        p { "Writing the report..." }
                    },
                    ViewState::Error(err) => rsx! {
                        p { class: "modal-body", "{err.message()}" }
                        div { class: "modal-actions",
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| on_close.call(()),
                                "Close"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| resource.restart(),
                                "Try again"
                            }
                        }
                    },
                    ViewState::Ready(preview) => rsx! {
                        div { class: "modal-body report-body", dangerous_inner_html: "{preview.html}" }
                        div { class: "modal-actions",
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| on_close.call(()),
                                "Close"
                            }
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| send.call(()),
                                "Send to parent"
                            }
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ReportTestHandles {
    send: std::rc::Rc<std::cell::RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl ReportTestHandles {
    pub(crate) fn send(&self) {
        (*self.send.borrow()).expect("report send registered").call(());
    }
}
