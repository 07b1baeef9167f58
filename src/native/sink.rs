//! Offscreen video sink: grabs one frame from the shared monitor.

use super::display::NativeStream;
use crate::capture::{FrameDimensions, FrameReady, PlatformError, VideoSink};
use image::RgbaImage;
use std::sync::{Arc, Mutex};
use xcap::Monitor;

/// Plays a `NativeStream` by grabbing a frame on a blocking task.
///
/// The readiness signal fires once, after the grab lands in `slot`.
pub struct NativeVideoSink {
    slot: Arc<Mutex<Option<RgbaImage>>>,
    frame: Option<RgbaImage>,
}

impl NativeVideoSink {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            frame: None,
        }
    }
}

impl Default for NativeVideoSink {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSink for NativeVideoSink {
    type Stream = NativeStream;
    type Frame = RgbaImage;

    fn attach(&mut self, stream: &NativeStream, size: FrameDimensions) -> FrameReady {
        let (tx, ready) = FrameReady::channel();

        let Some(monitor_id) = stream.video_source() else {
            tx.fail(PlatformError::new("Capture stream has no live video track"));
            return ready;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tx.fail(PlatformError::new(format!("No async runtime to play stream: {}", e)));
                return ready;
            }
        };

        let slot = Arc::clone(&self.slot);
        runtime.spawn_blocking(move || {
            let start = std::time::Instant::now();
            match grab_frame(monitor_id) {
                Ok(image) => {
                    log::debug!(
                        "[NATIVE] Frame {}x{} grabbed in {}ms (surface {}x{})",
                        image.width(),
                        image.height(),
                        start.elapsed().as_millis(),
                        size.width,
                        size.height
                    );
                    match slot.lock() {
                        Ok(mut guard) => {
                            *guard = Some(image);
                            tx.ready();
                        }
                        Err(_) => tx.fail(PlatformError::new("Frame buffer lock poisoned")),
                    }
                }
                Err(e) => tx.fail(e),
            }
        });

        ready
    }

    fn current_frame(&mut self) -> Option<&RgbaImage> {
        if self.frame.is_none() {
            self.frame = self.slot.lock().ok()?.take();
        }
        self.frame.as_ref()
    }

    fn detach(&mut self) {
        self.frame = None;
        if let Ok(mut guard) = self.slot.lock() {
            *guard = None;
        }
    }
}

fn grab_frame(monitor_id: u32) -> Result<RgbaImage, PlatformError> {
    let monitors = Monitor::all().map_err(|e| {
        PlatformError::new(format!("Failed to enumerate monitors: {}", e))
            .with_detail(format!("{:?}", e))
    })?;

    let monitor = monitors
        .into_iter()
        .find(|m| m.id().map(|id| id == monitor_id).unwrap_or(false))
        .ok_or_else(|| PlatformError::new(format!("Shared monitor {} disappeared", monitor_id)))?;

    monitor.capture_image().map_err(|e| {
        PlatformError::new(format!("Screen capture failed: {}", e)).with_detail(format!("{:?}", e))
    })
}
