//! Ownership of one live capture: the stream, its sink, and their release.

use super::dimensions::{self, FrameDimensions};
use super::platform::{CaptureStream, FrameReady, MediaTrack, VideoSink};

/// A granted capture plus the offscreen sink playing it.
///
/// Released exactly once: every track is stopped and the sink detached,
/// either by `release` or when the session is dropped on an early return
/// or unwind.
pub struct CaptureSession<K: VideoSink> {
    stream: K::Stream,
    sink: K,
    dimensions: FrameDimensions,
    released: bool,
}

impl<K: VideoSink> CaptureSession<K> {
    pub fn new(stream: K::Stream, sink: K) -> Self {
        let dimensions = dimensions::resolve(&stream);
        Self {
            stream,
            sink,
            dimensions,
            released: false,
        }
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    /// Points the sink at the stream and returns its one-shot readiness signal.
    pub fn play(&mut self) -> FrameReady {
        self.sink.attach(&self.stream, self.dimensions)
    }

    pub fn current_frame(&mut self) -> Option<&K::Frame> {
        self.sink.current_frame()
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for track in self.stream.tracks_mut().iter_mut() {
            track.stop();
            log::debug!("[CAPTURE] Stopped {:?} track \"{}\"", track.kind(), track.label());
        }
        self.sink.detach();

        log::debug!("[CAPTURE] Session released");
    }
}

impl<K: VideoSink> Drop for CaptureSession<K> {
    fn drop(&mut self) {
        self.release_once();
    }
}
