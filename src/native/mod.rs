//! Native host — the capture collaborators backed by the OS.
//!
//! `xcap` stands in for display-capture negotiation and the video sink,
//! `image` for the drawing surface, and the filesystem for downloads.

mod display;
mod download;
mod sink;
mod surface;

pub use display::{is_affirmative, select_monitor, Consent, MonitorInfo, NativePlatform, NativeStream, NativeTrack};
pub use download::{default_download_dir, numbered_path, DownloadError, FileDownloader};
pub use sink::NativeVideoSink;
pub use surface::{RasterSurface, MAX_SURFACE_PIXELS};
