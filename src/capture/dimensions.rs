//! Frame size resolution — functional core.
//!
//! No infrastructure dependencies: reads negotiated track settings,
//! returns the size of the drawing surface.

use super::platform::{CaptureStream, MediaTrack, TrackKind};
use serde::Serialize;

/// Negotiated settings reported by a track. Either dimension may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TrackSettings {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// Target size of the rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Component-wise maximum over the given settings. Absent values count as 0.
    pub fn from_settings<I>(settings: I) -> Self
    where
        I: IntoIterator<Item = TrackSettings>,
    {
        settings
            .into_iter()
            .fold(Self::default(), |acc, s| Self {
                width: acc.width.max(s.width.unwrap_or(0)),
                height: acc.height.max(s.height.unwrap_or(0)),
            })
    }
}

/// Computes the frame size for a stream from its video tracks only.
pub fn resolve<S: CaptureStream>(stream: &S) -> FrameDimensions {
    FrameDimensions::from_settings(
        stream
            .tracks()
            .iter()
            .filter(|t| t.kind() == TrackKind::Video)
            .map(|t| t.settings()),
    )
}
