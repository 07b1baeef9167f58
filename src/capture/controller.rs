//! Capture orchestration — one capture → render → download → cleanup cycle.

use super::dimensions::FrameDimensions;
use super::export::ImageExporter;
use super::options::CaptureOptions;
use super::outcome::{CaptureError, CaptureOutcome};
use super::platform::{CapturePlatform, Downloader, DrawingSurface, FrameReady, PlatformError};
use super::session::CaptureSession;
use super::state::{CaptureState, StateTracker};
use std::time::{Duration, Instant};

/// Drives capture cycles against a platform and a downloader.
///
/// Holds no per-call state, so overlapping calls each get their own session.
pub struct CaptureController<P, D> {
    platform: P,
    exporter: ImageExporter<D>,
    frame_timeout: Option<Duration>,
}

impl<P: CapturePlatform, D: Downloader> CaptureController<P, D> {
    pub fn new(platform: P, downloader: D) -> Self {
        Self {
            platform,
            exporter: ImageExporter::new(downloader),
            frame_timeout: None,
        }
    }

    /// Bounds the wait for the first frame. `None` waits indefinitely.
    pub fn with_frame_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub fn downloader(&self) -> &D {
        self.exporter.downloader()
    }

    /// Captures the screen and offers the frame for download as `file_name`.
    ///
    /// Never returns an error: every failure becomes `CaptureOutcome::Failure`.
    /// Tracks and sink are released before this returns on every path.
    pub async fn capture_screen(&self, options: &CaptureOptions, file_name: &str) -> CaptureOutcome {
        let start = Instant::now();
        let mut state = StateTracker::new();

        match self.run(&mut state, options, file_name).await {
            Ok(dims) => {
                state.advance(CaptureState::Exported);
                log::info!(
                    "[CAPTURE] Exported {} ({}x{}) in {}ms",
                    file_name,
                    dims.width,
                    dims.height,
                    start.elapsed().as_millis()
                );
                CaptureOutcome::success(file_name)
            }
            Err(err) => {
                log::warn!(
                    "[CAPTURE] {} while {}: {}",
                    err.kind(),
                    state.current(),
                    err
                );
                state.advance(CaptureState::Failed);
                err.into()
            }
        }
    }

    async fn run(
        &self,
        state: &mut StateTracker,
        options: &CaptureOptions,
        file_name: &str,
    ) -> Result<FrameDimensions, CaptureError> {
        if !self.platform.supports_display_capture() {
            return Err(CaptureError::CapabilityUnavailable {
                host: self.platform.host_name().to_string(),
            });
        }
        state.advance(CaptureState::CapabilityChecked);

        let constraints = options.constraints();
        log::info!(
            "[CAPTURE] Requesting display capture (audio={}, cursor={})",
            constraints.audio,
            constraints.video.cursor
        );
        state.advance(CaptureState::AwaitingConsent);
        let stream = self
            .platform
            .get_display_media(&constraints)
            .await
            .map_err(CaptureError::PermissionDenied)?;

        // From here on the session's Drop releases tracks and sink on any early return.
        let mut session = CaptureSession::new(stream, self.platform.create_video_sink());
        let dims = session.dimensions();
        if dims.is_empty() {
            log::warn!(
                "[CAPTURE] Stream reports no usable size ({}x{}); exporting an empty image",
                dims.width,
                dims.height
            );
        }

        let ready = session.play();
        state.advance(CaptureState::AwaitingFrame);
        self.wait_for_frame(ready).await?;

        state.advance(CaptureState::Rendering);
        let rendered = self.render_and_export(&mut session, file_name);
        session.release();

        rendered.map(|_| dims)
    }

    async fn wait_for_frame(&self, ready: FrameReady) -> Result<(), CaptureError> {
        let Some(limit) = self.frame_timeout else {
            return ready.wait().await.map_err(CaptureError::CaptureRejected);
        };

        match tokio::time::timeout(limit, ready.wait()).await {
            Ok(result) => result.map_err(CaptureError::CaptureRejected),
            Err(_) => Err(CaptureError::FrameTimeout(limit.as_millis() as u64)),
        }
    }

    fn render_and_export(
        &self,
        session: &mut CaptureSession<P::Sink>,
        file_name: &str,
    ) -> Result<(), CaptureError> {
        let dims = session.dimensions();
        let mut surface = self
            .platform
            .create_surface(dims)
            .map_err(CaptureError::RenderFailure)?;

        let frame = session.current_frame().ok_or_else(|| {
            CaptureError::RenderFailure(PlatformError::new("Video sink has no frame to draw"))
        })?;
        surface.draw_frame(frame, 0, 0, dims.width, dims.height);

        let data_url = surface.to_data_url().map_err(CaptureError::RenderFailure)?;
        self.exporter.export(&data_url, file_name);
        Ok(())
    }
}
