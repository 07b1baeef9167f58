//! Screen capture domain — public API.
//!
//! This module owns the capture → render → download pipeline.
//! Platform primitives come in through the traits in `platform`;
//! external code should only use the items exported here.

mod controller;
mod dimensions;
mod export;
mod options;
mod outcome;
mod platform;
mod session;
mod state;

pub use controller::CaptureController;
pub use dimensions::{resolve, FrameDimensions, TrackSettings};
pub use export::{decode_data_url, png_data_url, DataUrl, ExportError, ImageExporter, EMPTY_DATA_URL, PNG_MIME};
pub use options::{CaptureOptions, CursorPolicy, DisplayMediaConstraints, VideoConstraints};
pub use outcome::{CaptureError, CaptureOutcome};
pub use platform::{
    CapturePlatform, CaptureStream, Downloader, DrawingSurface, FrameReady, FrameReadySender,
    MediaTrack, PlatformError, TrackKind, VideoSink,
};
pub use session::CaptureSession;
pub use state::{CaptureState, StateTracker};

/// File name offered for every capture unless configured otherwise.
pub const DEFAULT_FILE_NAME: &str = "screenshot.png";
