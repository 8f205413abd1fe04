use dioxus::document::eval;
use dioxus::prelude::*;
use serde::Deserialize;
use services::{
    CaptureError, ChatService, ChatSession, Microphone, Opened, StopRequest, TutorRequest,
    VoiceRecorder,
};
use tutor_core::model::{Attachment, AttachmentKind};

use crate::context::AppContext;
use crate::vm::{ChatMessageVm, map_chat_log};

use super::scripts::{
    IMAGE_INPUT_ID, SCROLL_TO_BOTTOM_SCRIPT, open_image_picker_script, read_picked_image_script,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[derive(Debug, Deserialize)]
struct PickedImage {
    mime: String,
    data: String,
}

/// Sends one turn and writes the outcome back into the session.
async fn deliver(chat: &ChatService, mut session: Signal<ChatSession>, request: TutorRequest) {
    let outcome = chat.reply(request).await;
    let mut guard = session.write();
    let recorded = match outcome {
        Ok(reply) => guard.complete_turn(reply),
        Err(err) => {
            tracing::error!(%err, "tutor reply failed");
            guard.fail_turn(&err)
        }
    };
    if let Err(err) = recorded {
        tracing::warn!(%err, "reply arrived without a pending turn");
    }
}

/// Closes the device the recorder marked as closing, then sends the clip.
async fn close_and_send(
    chat: &ChatService,
    microphone: &dyn Microphone,
    mut recorder: Signal<VoiceRecorder>,
    mut session: Signal<ChatSession>,
    mut local_error: Signal<Option<String>>,
) {
    let captured = microphone.close().await;
    let stopped = recorder.write().finish_stop(captured);
    let audio = match stopped {
        Ok(audio) => audio,
        Err(err) => {
            tracing::warn!(%err, "recording discarded");
            local_error.set(Some(format!("The recording could not be used: {err}")));
            return;
        }
    };
    let request = session.write().begin_voice_turn(audio);
    match request {
        Ok(request) => deliver(chat, session, request).await,
        Err(err) => tracing::debug!(%err, "voice turn not sent"),
    }
}

#[component]
pub fn TutorView() -> Element {
    let ctx = use_context::<AppContext>();
    let chat = ctx.chat();
    let microphone = ctx.microphone();
    let clock = ctx.clock();

    let session = {
        let chat = chat.clone();
        use_signal(move || chat.start_session(clock))
    };
    let recorder = use_signal(VoiceRecorder::new);
    let mut draft = use_signal(String::new);
    let mut attachments = use_signal(Vec::<Attachment>::new);
    let local_error = use_signal(|| None::<String>);

    let send = {
        let chat = chat.clone();
        use_callback(move |()| {
            let mut session = session;
            let mut draft = draft;
            let mut attachments = attachments;
            let mut local_error = local_error;
            let text = draft();
            let pending = attachments();
            let request = session.write().begin_turn(&text, pending);
            match request {
                Ok(request) => {
                    draft.set(String::new());
                    attachments.set(Vec::new());
                    local_error.set(None);
                    let chat = chat.clone();
                    spawn(async move {
                        deliver(&chat, session, request).await;
                    });
                }
                Err(err) => tracing::debug!(%err, "turn not sent"),
            }
        })
    };

    let pick_image = use_callback(move |()| {
        let mut attachments = attachments;
        let mut local_error = local_error;
        spawn(async move {
            let Ok(picked) = eval(&read_picked_image_script()).join::<PickedImage>().await else {
                return;
            };
            if picked.data.is_empty() {
                return;
            }
            match Attachment::from_base64(AttachmentKind::Image, picked.mime, &picked.data) {
                Ok(image) => attachments.write().push(image),
                Err(err) => {
                    tracing::warn!(%err, "image rejected");
                    local_error.set(Some(format!("That file cannot be attached: {err}")));
                }
            }
        });
    });

    let start_recording = {
        let chat = chat.clone();
        let microphone = microphone.clone();
        use_callback(move |()| {
            let mut recorder = recorder;
            let mut local_error = local_error;
            if let Err(err) = recorder.write().begin_start() {
                tracing::debug!(%err, "press ignored");
                return;
            }
            let chat = chat.clone();
            let microphone = microphone.clone();
            spawn(async move {
                let opened = microphone.open().await;
                let started = recorder.write().finish_start(opened);
                match started {
                    Ok(Opened::Recording) => {}
                    Ok(Opened::Released) => {
                        close_and_send(&chat, microphone.as_ref(), recorder, session, local_error)
                            .await;
                    }
                    Err(CaptureError::PermissionDenied) => {}
                    Err(err) => local_error.set(Some(format!("Recording failed: {err}"))),
                }
            });
        })
    };

    let release = {
        let chat = chat.clone();
        let microphone = microphone.clone();
        use_callback(move |()| {
            let mut recorder = recorder;
            let request = recorder.write().request_stop();
            if request != StopRequest::Close {
                return;
            }
            let chat = chat.clone();
            let microphone = microphone.clone();
            spawn(async move {
                close_and_send(&chat, microphone.as_ref(), recorder, session, local_error).await;
            });
        })
    };

    let dismiss_notice = use_callback(move |()| {
        let mut recorder = recorder;
        recorder.write().dismiss_notice();
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<TutorTestHandles>() {
                handles.register(draft, send, start_recording, release);
            }
        }
    }

    use_effect(move || {
        let _ = session.read().log().len();
        let _ = eval(SCROLL_TO_BOTTOM_SCRIPT);
    });

    let messages: Vec<ChatMessageVm> = map_chat_log(session.read().log());
    let pending = session.read().is_pending();
    let session_error = session.read().last_error().map(str::to_string);
    let recording = recorder.read().is_recording();
    let mic_busy = recorder.read().is_busy();
    let notice = recorder.read().notice();
    let previews: Vec<(usize, String)> = attachments
        .read()
        .iter()
        .enumerate()
        .filter_map(|(index, attachment)| attachment.preview().map(|url| (index, url.to_string())))
        .collect();
    let can_send = !pending && (!draft.read().trim().is_empty() || !attachments.read().is_empty());
    let placeholder = if recording {
        "Listening..."
    } else {
        "Ask your tutor anything about English"
    };

    rsx! {
        div { class: "page tutor",
            h2 { "AI Tutor" }
            div { id: "chat-log", class: "chat-log",
                for message in messages {
                    div { key: "{message.id}", class: message.bubble_class(),
                        for (index, src) in message.images.iter().enumerate() {
                            img { key: "{index}", class: "bubble-image", src: "{src}" }
                        }
                        if message.has_audio {
                            span { class: "bubble-audio", "Voice message" }
                        }
                        div { class: "bubble-text", dangerous_inner_html: "{message.html}" }
                        span { class: "bubble-time", "{message.time}" }
                    }
                }
                if pending {
                    div { class: "bubble bubble-tutor bubble-typing", "Your tutor is typing..." }
                }
            }
            if let Some(err) = session_error {
                p { class: "chat-error", role: "alert", "The tutor could not answer: {err}" }
            }
            if let Some(err) = local_error() {
                p { class: "chat-error", role: "alert", "{err}" }
            }
            if !previews.is_empty() {
                div { class: "attachment-tray",
                    for (index, src) in previews {
                        div { key: "{index}", class: "attachment-preview",
                            img { src: "{src}" }
                            button {
                                class: "attachment-remove",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut pending = attachments.write();
                                    if index < pending.len() {
                                        pending.remove(index);
                                    }
                                },
                                "Remove"
                            }
                        }
                    }
                }
            }
            form {
                class: "chat-input",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    send.call(());
                },
                input {
                    id: IMAGE_INPUT_ID,
                    r#type: "file",
                    accept: "image/*",
                    hidden: true,
                    onchange: move |_| pick_image.call(()),
                }
                button {
                    class: "btn btn-icon",
                    r#type: "button",
                    title: "Attach an image",
                    disabled: pending,
                    onclick: move |_| {
                        let _ = eval(&open_image_picker_script());
                    },
                    "Image"
                }
                button {
                    class: if recording { "btn btn-icon btn-recording" } else { "btn btn-icon" },
                    r#type: "button",
                    title: "Hold to speak",
                    disabled: pending,
                    onmousedown: move |_| start_recording.call(()),
                    onmouseup: move |_| release.call(()),
                    onmouseleave: move |_| release.call(()),
                    if recording { "Recording..." } else { "Hold to speak" }
                }
                input {
                    id: "chat-text",
                    r#type: "text",
                    placeholder: "{placeholder}",
                    disabled: pending || mic_busy,
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: !can_send,
                    "Send"
                }
            }
            if let Some(notice) = notice {
                div {
                    class: "modal-overlay",
                    onclick: move |_| dismiss_notice.call(()),
                    div {
                        class: "modal",
                        onclick: move |evt| evt.stop_propagation(),
                        h3 { class: "modal-title", "Microphone blocked" }
                        p { class: "modal-body", "{notice.message()}" }
                        div { class: "modal-actions",
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| dismiss_notice.call(()),
                                "OK"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct TutorTestHandles {
    draft: Rc<RefCell<Option<Signal<String>>>>,
    send: Rc<RefCell<Option<Callback<()>>>>,
    press: Rc<RefCell<Option<Callback<()>>>>,
    release: Rc<RefCell<Option<Callback<()>>>>,
}

#[cfg(test)]
impl TutorTestHandles {
    fn register(
        &self,
        draft: Signal<String>,
        send: Callback<()>,
        press: Callback<()>,
        release: Callback<()>,
    ) {
        *self.draft.borrow_mut() = Some(draft);
        *self.send.borrow_mut() = Some(send);
        *self.press.borrow_mut() = Some(press);
        *self.release.borrow_mut() = Some(release);
    }

    pub(crate) fn type_and_send(&self, text: &str) {
        let mut draft = (*self.draft.borrow()).expect("tutor draft registered");
        draft.set(text.to_string());
        (*self.send.borrow()).expect("tutor send registered").call(());
    }

    pub(crate) fn press_microphone(&self) {
        (*self.press.borrow()).expect("tutor press registered").call(());
    }

    pub(crate) fn release_microphone(&self) {
        (*self.release.borrow()).expect("tutor release registered").call(());
    }
}
