use async_trait::async_trait;
use dioxus::document::eval;
use serde::Deserialize;
use services::{CaptureError, CapturedAudio, Microphone};
use tutor_core::model::{Attachment, AttachmentKind};

const RECORDING_MIME: &str = "audio/webm";

/// Records through the webview's `getUserMedia` + `MediaRecorder`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebviewMicrophone;

#[derive(Debug, Deserialize)]
struct OpenReply {
    status: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Deserialize)]
struct CloseReply {
    #[serde(default)]
    mime: String,
    #[serde(default)]
    data: String,
}

#[async_trait(?Send)]
impl Microphone for WebviewMicrophone {
    async fn open(&self) -> Result<(), CaptureError> {
        let reply = eval(OPEN_SCRIPT)
            .join::<OpenReply>()
            .await
            .map_err(|err| CaptureError::Unavailable(err.to_string()))?;
        match reply.status.as_str() {
            "ok" => Ok(()),
            "denied" => Err(CaptureError::PermissionDenied),
            _ => Err(CaptureError::Unavailable(reply.detail)),
        }
    }

    async fn close(&self) -> Result<CapturedAudio, CaptureError> {
        let reply = eval(CLOSE_SCRIPT)
            .join::<CloseReply>()
            .await
            .map_err(|err| CaptureError::Unavailable(err.to_string()))?;
        let mime = if reply.mime.is_empty() {
            RECORDING_MIME.to_string()
        } else {
            reply.mime
        };
        let attachment = Attachment::from_base64(AttachmentKind::Audio, mime, &reply.data)?;
        Ok(CapturedAudio {
            mime_type: attachment.mime_type().to_string(),
            bytes: attachment.bytes().to_vec(),
        })
    }
}

const OPEN_SCRIPT: &str = r#"
    try {
        const stream = await navigator.mediaDevices.getUserMedia({ audio: true });
        const recorder = new MediaRecorder(stream);
        const state = { stream, recorder, chunks: [] };
        recorder.ondataavailable = (event) => {
            if (event.data && event.data.size > 0) state.chunks.push(event.data);
        };
        recorder.start();
        window.__tutorRecorder = state;
        return { status: "ok", detail: "" };
    } catch (err) {
        const name = err && err.name ? err.name : "";
        if (name === "NotAllowedError" || name === "SecurityError") {
            return { status: "denied", detail: name };
        }
        return { status: "error", detail: String(err) };
    }
"#;

const CLOSE_SCRIPT: &str = r#"
    const state = window.__tutorRecorder;
    window.__tutorRecorder = null;
    if (!state) {
        return { mime: "", data: "" };
    }
    const blob = await new Promise((resolve) => {
        state.recorder.onstop = () => {
            resolve(new Blob(state.chunks, { type: "audio/webm" }));
        };
        if (state.recorder.state === "inactive") {
            resolve(new Blob(state.chunks, { type: "audio/webm" }));
        } else {
            state.recorder.stop();
        }
    });
    state.stream.getTracks().forEach((track) => track.stop());
    const data = await new Promise((resolve) => {
        const reader = new FileReader();
        reader.onloadend = () => {
            const text = String(reader.result || "");
            const comma = text.indexOf(",");
            resolve(comma >= 0 ? text.slice(comma + 1) : "");
        };
        reader.readAsDataURL(blob);
    });
    return { mime: "audio/webm", data };
"#;
