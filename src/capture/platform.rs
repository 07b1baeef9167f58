//! Platform collaborators the capture pipeline calls into.
//!
//! The controller only sequences these calls. The native implementation
//! lives in `crate::native`; tests provide in-memory fakes.

use super::dimensions::{FrameDimensions, TrackSettings};
use super::options::DisplayMediaConstraints;
use async_trait::async_trait;
use tokio::sync::oneshot;

/// An error reported by a platform collaborator.
///
/// `message` is the platform's own text and is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PlatformError {
    pub message: String,
    pub detail: Option<String>,
}

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

/// One media track of a capture session.
pub trait MediaTrack: Send {
    fn kind(&self) -> TrackKind;

    fn label(&self) -> &str;

    fn settings(&self) -> TrackSettings;

    /// Stops the track and releases whatever the platform holds for it.
    fn stop(&mut self);
}

/// An active capture handle producing zero or more tracks.
pub trait CaptureStream: Send {
    type Track: MediaTrack;

    fn tracks(&self) -> &[Self::Track];

    fn tracks_mut(&mut self) -> &mut [Self::Track];
}

/// Single-shot "frame ready" signal from a video sink.
///
/// Consumed by `wait`, so it resolves at most once and cannot be re-armed.
#[derive(Debug)]
pub struct FrameReady {
    rx: oneshot::Receiver<Result<(), PlatformError>>,
}

/// Sending half of a `FrameReady` signal, held by the sink.
#[derive(Debug)]
pub struct FrameReadySender {
    tx: oneshot::Sender<Result<(), PlatformError>>,
}

impl FrameReady {
    pub fn channel() -> (FrameReadySender, FrameReady) {
        let (tx, rx) = oneshot::channel();
        (FrameReadySender { tx }, FrameReady { rx })
    }

    /// Suspends until the sink can render its current frame.
    pub async fn wait(self) -> Result<(), PlatformError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(PlatformError::new(
                "Video sink closed before a frame was ready",
            )),
        }
    }
}

impl FrameReadySender {
    pub fn ready(self) {
        // Receiver gone means the capture already failed; nothing to notify.
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(self, error: PlatformError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Offscreen video element: plays a stream and exposes its current frame.
pub trait VideoSink: Send {
    type Stream: CaptureStream;
    type Frame;

    /// Attaches the stream as the sink's source with autoplay on.
    ///
    /// The returned signal fires once, when enough data is buffered
    /// to render a frame.
    fn attach(&mut self, stream: &Self::Stream, size: FrameDimensions) -> FrameReady;

    fn current_frame(&mut self) -> Option<&Self::Frame>;

    /// Clears the sink's source.
    fn detach(&mut self);
}

/// Fixed-size pixel buffer that can be painted into and encoded.
pub trait DrawingSurface {
    type Frame;

    /// Copies `frame` into the rectangle at (`x`, `y`), scaled to `width` x `height`.
    fn draw_frame(&mut self, frame: &Self::Frame, x: u32, y: u32, width: u32, height: u32);

    /// Encodes the contents as a PNG data URL.
    fn to_data_url(&self) -> Result<String, PlatformError>;
}

/// The host environment's capture, playback and raster primitives.
#[async_trait]
pub trait CapturePlatform: Send + Sync {
    type Stream: CaptureStream;
    type Sink: VideoSink<Stream = Self::Stream>;
    type Surface: DrawingSurface<Frame = <Self::Sink as VideoSink>::Frame>;

    /// Name used in the "does not support" message.
    fn host_name(&self) -> &str {
        "Browser"
    }

    /// Whether display capture exists at all. Must not acquire anything.
    fn supports_display_capture(&self) -> bool;

    /// Asks the user for a capture session. May wait indefinitely on consent.
    async fn get_display_media(
        &self,
        constraints: &DisplayMediaConstraints,
    ) -> Result<Self::Stream, PlatformError>;

    fn create_video_sink(&self) -> Self::Sink;

    /// Allocates a drawing surface. Fails when no usable context is available.
    fn create_surface(&self, size: FrameDimensions) -> Result<Self::Surface, PlatformError>;
}

/// Offers encoded data to the user as a saved file. Fire-and-forget.
pub trait Downloader: Send + Sync {
    fn download(&self, data_url: &str, file_name: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_ready_resolves_once_signalled() {
        let (tx, ready) = FrameReady::channel();
        tx.ready();
        assert_eq!(ready.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn frame_ready_carries_sink_failure() {
        let (tx, ready) = FrameReady::channel();
        tx.fail(PlatformError::new("decoder crashed"));
        let err = ready.wait().await.unwrap_err();
        assert_eq!(err.message, "decoder crashed");
    }

    #[tokio::test]
    async fn dropped_sender_is_an_error() {
        let (tx, ready) = FrameReady::channel();
        drop(tx);
        assert!(ready.wait().await.is_err());
    }

    #[test]
    fn platform_error_displays_message_only() {
        let err = PlatformError::new("Permission denied").with_detail("NotAllowedError");
        assert_eq!(err.to_string(), "Permission denied");
        assert_eq!(err.detail.as_deref(), Some("NotAllowedError"));
    }
}
