//! Display capture using the `xcap` crate.
//!
//! This is the infrastructure layer — it talks to the OS. A "capture
//! session" here is one selected monitor, granted after a consent prompt
//! on the terminal.

use super::sink::NativeVideoSink;
use super::surface::RasterSurface;
use crate::capture::{
    CapturePlatform, CaptureStream, DisplayMediaConstraints, FrameDimensions, MediaTrack,
    PlatformError, TrackKind, TrackSettings,
};
use async_trait::async_trait;
use std::io::Write;
use xcap::Monitor;

/// Whether the native consent prompt is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    /// Ask on stdin before every capture.
    Prompt,
    /// Treat every request as granted.
    Granted,
}

/// Snapshot of one monitor, detached from the xcap handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    pub id: u32,
    pub name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub is_primary: bool,
}

pub struct NativePlatform {
    monitor: Option<String>,
    consent: Consent,
    available: bool,
}

impl NativePlatform {
    /// `monitor` is a case-insensitive name fragment; `None` picks the primary.
    ///
    /// Detects display capture once, here, so the per-capture capability
    /// check never touches the OS. Call before entering the runtime.
    pub fn new(monitor: Option<String>, consent: Consent) -> Self {
        Self::with_availability(monitor, consent, detect_display_capture())
    }

    /// Builds a platform with a known capability result.
    pub fn with_availability(monitor: Option<String>, consent: Consent, available: bool) -> Self {
        Self {
            monitor,
            consent,
            available,
        }
    }
}

fn detect_display_capture() -> bool {
    match Monitor::all() {
        Ok(monitors) => {
            log::debug!("[NATIVE] {} monitor(s) available for capture", monitors.len());
            !monitors.is_empty()
        }
        Err(e) => {
            log::warn!("[NATIVE] Display capture unavailable: {}", e);
            false
        }
    }
}

#[async_trait]
impl CapturePlatform for NativePlatform {
    type Stream = NativeStream;
    type Sink = NativeVideoSink;
    type Surface = RasterSurface;

    fn host_name(&self) -> &str {
        "This desktop session"
    }

    fn supports_display_capture(&self) -> bool {
        self.available
    }

    async fn get_display_media(
        &self,
        constraints: &DisplayMediaConstraints,
    ) -> Result<NativeStream, PlatformError> {
        let monitors = tokio::task::spawn_blocking(list_monitors)
            .await
            .map_err(|e| PlatformError::new(format!("Monitor enumeration task failed: {}", e)))??;

        let chosen = select_monitor(&monitors, self.monitor.as_deref())
            .cloned()
            .ok_or_else(|| match &self.monitor {
                Some(wanted) => PlatformError::new(format!("No monitor matches '{}'", wanted)),
                None => PlatformError::new("No monitor available to share"),
            })?;

        if constraints.video.cursor != crate::capture::CursorPolicy::Never {
            log::debug!(
                "[NATIVE] Cursor policy '{}' is advisory; xcap frames never include the cursor",
                constraints.video.cursor
            );
        }

        if self.consent == Consent::Prompt {
            let name = chosen.name.clone();
            let audio = constraints.audio;
            let granted = tokio::task::spawn_blocking(move || ask_consent(&name, audio))
                .await
                .map_err(|e| PlatformError::new(format!("Consent prompt failed: {}", e)))??;
            if !granted {
                return Err(PlatformError::new("Permission denied")
                    .with_detail(format!("User declined to share \"{}\"", chosen.name)));
            }
        }

        log::info!(
            "[NATIVE] Sharing monitor \"{}\" (id {}, {}x{})",
            chosen.name,
            chosen.id,
            chosen.width.unwrap_or(0),
            chosen.height.unwrap_or(0)
        );
        Ok(NativeStream::new(&chosen, constraints.audio))
    }

    fn create_video_sink(&self) -> NativeVideoSink {
        NativeVideoSink::new()
    }

    fn create_surface(&self, size: FrameDimensions) -> Result<RasterSurface, PlatformError> {
        RasterSurface::new(size)
    }
}

fn list_monitors() -> Result<Vec<MonitorInfo>, PlatformError> {
    let monitors = Monitor::all().map_err(|e| {
        PlatformError::new(format!("Failed to enumerate monitors: {}", e))
            .with_detail(format!("{:?}", e))
    })?;

    Ok(monitors
        .iter()
        .map(|m| MonitorInfo {
            id: m.id().unwrap_or(0),
            name: m.name().unwrap_or_default(),
            width: m.width().ok(),
            height: m.height().ok(),
            is_primary: m.is_primary().unwrap_or(false),
        })
        .collect())
}

/// Picks the monitor to share.
///
/// With a name fragment: the first monitor whose name contains it.
/// Otherwise the primary monitor, falling back to the first one.
pub fn select_monitor<'a>(monitors: &'a [MonitorInfo], wanted: Option<&str>) -> Option<&'a MonitorInfo> {
    if let Some(wanted) = wanted {
        let wanted = wanted.to_lowercase();
        return monitors
            .iter()
            .find(|m| m.name.to_lowercase().contains(&wanted));
    }

    monitors
        .iter()
        .find(|m| m.is_primary)
        .or_else(|| monitors.first())
}

fn ask_consent(monitor_name: &str, audio: bool) -> Result<bool, PlatformError> {
    let audio_note = if audio { " with system audio" } else { "" };
    print!("Share your screen \"{}\"{}? [y/N] ", monitor_name, audio_note);
    std::io::stdout()
        .flush()
        .map_err(|e| PlatformError::new(format!("Consent prompt failed: {}", e)))?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(|e| PlatformError::new(format!("Consent prompt failed: {}", e)))?;
    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// One track of a native capture.
#[derive(Debug, Clone)]
pub struct NativeTrack {
    kind: TrackKind,
    label: String,
    settings: TrackSettings,
    monitor_id: Option<u32>,
    live: bool,
}

impl NativeTrack {
    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl MediaTrack for NativeTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn settings(&self) -> TrackSettings {
        self.settings
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            log::debug!("[NATIVE] Stopped {:?} track \"{}\"", self.kind, self.label);
        }
    }
}

/// A granted monitor share: one video track, plus an audio track on request.
#[derive(Debug)]
pub struct NativeStream {
    tracks: Vec<NativeTrack>,
}

impl NativeStream {
    fn new(monitor: &MonitorInfo, audio: bool) -> Self {
        let mut tracks = vec![NativeTrack {
            kind: TrackKind::Video,
            label: monitor.name.clone(),
            settings: TrackSettings {
                width: monitor.width,
                height: monitor.height,
            },
            monitor_id: Some(monitor.id),
            live: true,
        }];

        // xcap has no loopback audio; the track exists so it can be stopped like the browser's.
        if audio {
            tracks.push(NativeTrack {
                kind: TrackKind::Audio,
                label: "System audio".to_string(),
                settings: TrackSettings::default(),
                monitor_id: None,
                live: true,
            });
        }

        Self { tracks }
    }

    /// Monitor behind the first live video track.
    pub fn video_source(&self) -> Option<u32> {
        self.tracks
            .iter()
            .filter(|t| t.kind == TrackKind::Video && t.live)
            .find_map(|t| t.monitor_id)
    }
}

impl CaptureStream for NativeStream {
    type Track = NativeTrack;

    fn tracks(&self) -> &[NativeTrack] {
        &self.tracks
    }

    fn tracks_mut(&mut self) -> &mut [NativeTrack] {
        &mut self.tracks
    }
}
