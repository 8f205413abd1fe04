use async_trait::async_trait;
use tutor_core::model::Attachment;

use crate::error::CaptureError;

/// Raw bytes captured by a microphone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Audio input device.
///
/// `close` must release the device (stop every track) even when the
/// recording turns out empty.
#[async_trait(?Send)]
pub trait Microphone {
    /// # Errors
    ///
    /// Returns `CaptureError::PermissionDenied` when access is refused.
    async fn open(&self) -> Result<(), CaptureError>;

    /// # Errors
    ///
    /// Returns `CaptureError` when nothing could be read back from the device.
    async fn close(&self) -> Result<CapturedAudio, CaptureError>;
}

/// Blocking message the UI shows until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderNotice {
    PermissionDenied,
}

impl RecorderNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "Please allow microphone access to ask a voice question.",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    /// `open` is in flight; `release_requested` is set when the button was
    /// let go before the device answered.
    Opening { release_requested: bool },
    Recording,
    /// `close` is in flight.
    Closing,
}

/// What a successful open means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    /// Keep recording until released.
    Recording,
    /// Released while opening: the caller must close the device now.
    Released,
}

/// What releasing the button asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRequest {
    /// The device is open: close it now.
    Close,
    /// Still opening; the device is closed as soon as the open finishes.
    Deferred,
    Ignored,
}

/// Press-and-hold recording state.
///
/// Every transition is synchronous so the UI can record it before awaiting
/// the device; a second press while opening, recording or closing is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceRecorder {
    phase: Phase,
    notice: Option<RecorderNotice>,
}

impl VoiceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.phase == Phase::Recording
    }

    /// True from the press until the device is closed again.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[must_use]
    pub fn notice(&self) -> Option<RecorderNotice> {
        self.notice
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Claim the device before calling `Microphone::open`.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::AlreadyRecording` unless the recorder is idle.
    pub fn begin_start(&mut self) -> Result<(), CaptureError> {
        if self.phase != Phase::Idle {
            return Err(CaptureError::AlreadyRecording);
        }
        self.phase = Phase::Opening {
            release_requested: false,
        };
        Ok(())
    }

    /// Record the outcome of `Microphone::open`. A denied permission leaves
    /// the recorder idle and raises a notice.
    ///
    /// # Errors
    ///
    /// Returns the microphone's error.
    pub fn finish_start(
        &mut self,
        opened: Result<(), CaptureError>,
    ) -> Result<Opened, CaptureError> {
        let release_requested = matches!(
            self.phase,
            Phase::Opening {
                release_requested: true
            }
        );
        match opened {
            Ok(()) => {
                self.notice = None;
                if release_requested {
                    tracing::debug!("released while opening; closing");
                    self.phase = Phase::Closing;
                    Ok(Opened::Released)
                } else {
                    tracing::debug!("recording started");
                    self.phase = Phase::Recording;
                    Ok(Opened::Recording)
                }
            }
            Err(err) => {
                self.phase = Phase::Idle;
                if err == CaptureError::PermissionDenied {
                    self.notice = Some(RecorderNotice::PermissionDenied);
                }
                tracing::warn!(error = %err, "microphone unavailable");
                Err(err)
            }
        }
    }

    /// Button released.
    pub fn request_stop(&mut self) -> StopRequest {
        match self.phase {
            Phase::Opening { .. } => {
                self.phase = Phase::Opening {
                    release_requested: true,
                };
                StopRequest::Deferred
            }
            Phase::Recording => {
                self.phase = Phase::Closing;
                StopRequest::Close
            }
            Phase::Idle | Phase::Closing => StopRequest::Ignored,
        }
    }

    /// Record the outcome of `Microphone::close` and package the audio.
    ///
    /// # Errors
    ///
    /// Returns the microphone's error or an attachment error for an empty
    /// recording.
    pub fn finish_stop(
        &mut self,
        captured: Result<CapturedAudio, CaptureError>,
    ) -> Result<Attachment, CaptureError> {
        self.phase = Phase::Idle;
        let audio = captured?;
        tracing::debug!(bytes = audio.bytes.len(), "recording stopped");
        Ok(Attachment::audio(audio.mime_type, audio.bytes)?)
    }

    /// Open the device and start capturing.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::AlreadyRecording` or the microphone's error.
    pub async fn start(&mut self, microphone: &dyn Microphone) -> Result<(), CaptureError> {
        self.begin_start()?;
        let opened = microphone.open().await;
        self.finish_start(opened).map(|_| ())
    }

    /// Stop capturing and package the audio for a chat turn.
    ///
    /// # Errors
    ///
    /// Returns `CaptureError::NotRecording`, the microphone's error, or an
    /// attachment error for an empty recording.
    pub async fn stop(&mut self, microphone: &dyn Microphone) -> Result<Attachment, CaptureError> {
        if self.request_stop() != StopRequest::Close {
            return Err(CaptureError::NotRecording);
        }
        let captured = microphone.close().await;
        self.finish_stop(captured)
    }
}
